//! # punch-runtime
//!
//! The unit/task synchronization core.
//!
//! - **Repository**: [`UnitRepository`] reads and mutates unit documents in
//!   `<namespace>/units`. Every task change rewrites the whole `trades` field.
//! - **Controller**: [`Controller`] owns the `Home ↔ UnitDetail` navigation
//!   state and exactly one live subscription matching the current view.
//! - **Actions**: [`Actions`] is a detached, cloneable handle for the user
//!   actions, so a slow action never stalls the feed. Failures become
//!   [`Notice`]s.
//! - **Metrics**: [`metrics::install_recorder`] installs the Prometheus
//!   recorder the counters are reported to.
//! - **Bulk generation**: [`bulk::generate_buildings`] creates the 80-unit
//!   plan sequentially and halts at the first failure.
//! - **Bootstrap**: [`bootstrap::start`] signs in and builds the controller.
//!
//! ## Crate Position
//!
//! Depends on punch-core, punch-settings, punch-store, punch-llm.
//! Depended on by punch-app.

#![deny(unsafe_code)]

pub mod actions;
pub mod bootstrap;
pub mod bulk;
pub mod controller;
pub mod errors;
pub mod metrics;
pub mod notices;
pub mod repository;

#[cfg(test)]
pub(crate) mod testutil;

pub use actions::Actions;
pub use bulk::{BulkFailure, BulkReport};
pub use controller::{Controller, Update, View};
pub use errors::{ControllerError, RepositoryError};
pub use notices::{Notice, NoticeEmitter, NoticeKind};
pub use repository::{AppendOutcome, UnitRepository};
