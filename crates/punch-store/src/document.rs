//! The document store contract.
//!
//! Documents are schemaless JSON values addressed by a collection path and a
//! key. Collection paths are scoped by a namespace (`<namespace>/units`).

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::StoreError;
use crate::subscription::Subscription;

/// One document of a collection snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentEntry {
    /// Document key.
    pub key: String,
    /// Full document value.
    pub value: Value,
}

/// Every document of a collection at one point in time, in store order.
pub type CollectionSnapshot = Vec<DocumentEntry>;

/// Build a namespaced collection path, e.g. `default-app-id/units`.
#[must_use]
pub fn collection_path(namespace: &str, collection: &str) -> String {
    format!("{namespace}/{collection}")
}

/// A schemaless collection/document store with live subscriptions.
///
/// Writes are last-write-wins; nothing here is transactional. Subscriptions
/// deliver an initial snapshot immediately, then a full snapshot after every
/// change, until dropped.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or fully overwrite a document.
    async fn set_document(&self, collection: &str, key: &str, value: Value)
    -> Result<(), StoreError>;

    /// Replace the named top-level fields of an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] when the document does not exist.
    async fn update_fields(
        &self,
        collection: &str,
        key: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Read a document once.
    async fn get_document(&self, collection: &str, key: &str)
    -> Result<Option<Value>, StoreError>;

    /// Remove a document. Removing a missing document is not an error.
    async fn delete_document(&self, collection: &str, key: &str) -> Result<(), StoreError>;

    /// Live snapshots of a whole collection.
    fn subscribe_collection(&self, collection: &str) -> Subscription<CollectionSnapshot>;

    /// Live snapshots of one document (`None` while it does not exist).
    fn subscribe_document(&self, collection: &str, key: &str) -> Subscription<Option<Value>>;
}
