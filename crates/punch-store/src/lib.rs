//! # punch-store
//!
//! The external collaborators the tracker talks to, behind narrow traits:
//!
//! - **Document store**: [`DocumentStore`] — schemaless collection/key documents
//!   with one-shot reads, whole-document and per-field writes, and live
//!   subscriptions that push full snapshots on every change.
//! - **Subscriptions**: [`Subscription`] — a cancellable stream of snapshots.
//!   Dropping the handle unregisters it.
//! - **Identity**: [`IdentityProvider`] — anonymous or token sign-in, with a
//!   watch channel reporting the current identity.
//!
//! [`MemoryStore`] and [`LocalIdentityProvider`] are the in-process
//! implementations used by the binary and by tests.
//!
//! ## Crate Position
//!
//! Depends on nothing internal. Depended on by punch-runtime and punch-app.

#![deny(unsafe_code)]

pub mod document;
pub mod errors;
pub mod identity;
pub mod memory;
pub mod subscription;

pub use document::{CollectionSnapshot, DocumentEntry, DocumentStore, collection_path};
pub use errors::{IdentityError, StoreError};
pub use identity::{Identity, IdentityProvider, LocalIdentityProvider};
pub use memory::MemoryStore;
pub use subscription::Subscription;
