//! # punch-core
//!
//! Foundation types and utilities for the punch-list tracker.
//!
//! This crate provides the shared vocabulary that all other punch crates depend on:
//!
//! - **Units**: [`units::Unit`], [`units::Task`], and the [`units::Trades`] map
//! - **Branded IDs**: [`ids::UnitId`] as a newtype over the unit's name
//! - **Default checklist**: [`units::default_trades`] with the five canned trades
//! - **Bulk plan**: [`bulk::bulk_unit_plan`] for the 4 × 20 building generator
//! - **Links**: [`link::unit_from_link`] and [`link::share_link`]
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` subscriber
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other punch crates.

#![deny(unsafe_code)]

pub mod bulk;
pub mod ids;
pub mod link;
pub mod logging;
pub mod units;

pub use ids::UnitId;
pub use units::{Progress, Task, TaskLookupError, Trades, Unit};
