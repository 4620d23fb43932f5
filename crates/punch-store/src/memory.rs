//! In-process [`DocumentStore`] with live snapshot fan-out.
//!
//! Every write takes the state lock, applies the change, and pushes a fresh
//! snapshot to each matching watcher before releasing it, so watchers observe
//! writes in commit order. Watchers whose receiving end is gone are pruned on
//! the next push; dropping a [`Subscription`] removes its watcher at once.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::document::{CollectionSnapshot, DocumentEntry, DocumentStore};
use crate::errors::StoreError;
use crate::subscription::Subscription;

/// Shared in-memory document store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    /// Collection path → (key → document), key-ordered.
    collections: HashMap<String, BTreeMap<String, Value>>,
    collection_watchers: Vec<CollectionWatcher>,
    document_watchers: Vec<DocumentWatcher>,
    next_watcher_id: u64,
}

struct CollectionWatcher {
    id: u64,
    collection: String,
    tx: mpsc::UnboundedSender<CollectionSnapshot>,
}

struct DocumentWatcher {
    id: u64,
    collection: String,
    key: String,
    tx: mpsc::UnboundedSender<Option<Value>>,
}

impl StoreState {
    fn allocate_id(&mut self) -> u64 {
        self.next_watcher_id += 1;
        self.next_watcher_id
    }

    fn snapshot(&self, collection: &str) -> CollectionSnapshot {
        self.collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(key, value)| DocumentEntry {
                        key: key.clone(),
                        value: value.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn document(&self, collection: &str, key: &str) -> Option<Value> {
        self.collections.get(collection)?.get(key).cloned()
    }

    /// Push fresh snapshots for a changed document.
    fn notify(&mut self, collection: &str, key: &str) {
        if self
            .collection_watchers
            .iter()
            .any(|w| w.collection == collection)
        {
            let snapshot = self.snapshot(collection);
            self.collection_watchers
                .retain(|w| w.collection != collection || w.tx.send(snapshot.clone()).is_ok());
        }

        if self
            .document_watchers
            .iter()
            .any(|w| w.collection == collection && w.key == key)
        {
            let doc = self.document(collection, key);
            self.document_watchers.retain(|w| {
                w.collection != collection || w.key != key || w.tx.send(doc.clone()).is_ok()
            });
        }
        trace!(collection, key, "pushed snapshots");
    }

    fn remove_watcher(&mut self, id: u64) {
        self.collection_watchers.retain(|w| w.id != id);
        self.document_watchers.retain(|w| w.id != id);
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions (collection and document).
    pub fn watcher_count(&self) -> usize {
        let state = self.state.lock();
        state.collection_watchers.len() + state.document_watchers.len()
    }

    /// Number of documents currently in `collection`.
    pub fn document_count(&self, collection: &str) -> usize {
        self.state
            .lock()
            .collections
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    fn cancel_hook(&self, id: u64) -> impl FnOnce() + Send + 'static {
        let weak: Weak<Mutex<StoreState>> = Arc::downgrade(&self.state);
        move || {
            if let Some(state) = weak.upgrade() {
                state.lock().remove_watcher(id);
                debug!(watcher = id, "subscription cancelled");
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn set_document(
        &self,
        collection: &str,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let _ = state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value);
        state.notify(collection, key);
        debug!(collection, key, "document set");
        Ok(())
    }

    async fn update_fields(
        &self,
        collection: &str,
        key: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let doc = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(key))
            .ok_or_else(|| StoreError::not_found(collection, key))?;
        match doc {
            Value::Object(existing) => existing.extend(fields),
            other => *other = Value::Object(fields),
        }
        state.notify(collection, key);
        debug!(collection, key, "document fields updated");
        Ok(())
    }

    async fn get_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Value>, StoreError> {
        Ok(self.state.lock().document(collection, key))
    }

    async fn delete_document(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let removed = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(key))
            .is_some();
        if removed {
            state.notify(collection, key);
            debug!(collection, key, "document deleted");
        }
        Ok(())
    }

    fn subscribe_collection(&self, collection: &str) -> Subscription<CollectionSnapshot> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut state = self.state.lock();
            let id = state.allocate_id();
            let _ = tx.send(state.snapshot(collection));
            state.collection_watchers.push(CollectionWatcher {
                id,
                collection: collection.to_string(),
                tx,
            });
            id
        };
        debug!(collection, watcher = id, "collection subscription opened");
        Subscription::from_receiver(rx, self.cancel_hook(id))
    }

    fn subscribe_document(&self, collection: &str, key: &str) -> Subscription<Option<Value>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut state = self.state.lock();
            let id = state.allocate_id();
            let _ = tx.send(state.document(collection, key));
            state.document_watchers.push(DocumentWatcher {
                id,
                collection: collection.to_string(),
                key: key.to_string(),
                tx,
            });
            id
        };
        debug!(collection, key, watcher = id, "document subscription opened");
        Subscription::from_receiver(rx, self.cancel_hook(id))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
