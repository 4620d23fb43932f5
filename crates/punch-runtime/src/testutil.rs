//! Test doubles shared by the inline test modules.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use punch_llm::{SuggestTasks, SuggestionError};
use punch_store::{
    CollectionSnapshot, DocumentStore, Identity, MemoryStore, StoreError, Subscription,
};
use serde_json::{Map, Value};

pub(crate) fn test_identity() -> Identity {
    Identity {
        uid: "user-test".into(),
        anonymous: false,
    }
}

/// [`MemoryStore`] wrapper that counts writes and can fail the Nth
/// `set_document` call (1-based).
#[derive(Clone, Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    fail_set_on: Option<usize>,
    calls: Arc<Calls>,
}

#[derive(Default)]
struct Calls {
    set: AtomicUsize,
    update: AtomicUsize,
}

impl FlakyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_set_on(call: usize) -> Self {
        Self {
            fail_set_on: Some(call),
            ..Self::default()
        }
    }

    pub(crate) fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub(crate) fn set_calls(&self) -> usize {
        self.calls.set.load(Ordering::SeqCst)
    }

    pub(crate) fn update_calls(&self) -> usize {
        self.calls.update.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn set_document(
        &self,
        collection: &str,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let call = self.calls.set.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_set_on == Some(call) {
            return Err(StoreError::Unavailable(format!("injected failure on write {call}")));
        }
        self.inner.set_document(collection, key, value).await
    }

    async fn update_fields(
        &self,
        collection: &str,
        key: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let _ = self.calls.update.fetch_add(1, Ordering::SeqCst);
        self.inner.update_fields(collection, key, fields).await
    }

    async fn get_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Value>, StoreError> {
        self.inner.get_document(collection, key).await
    }

    async fn delete_document(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        self.inner.delete_document(collection, key).await
    }

    fn subscribe_collection(&self, collection: &str) -> Subscription<CollectionSnapshot> {
        self.inner.subscribe_collection(collection)
    }

    fn subscribe_document(&self, collection: &str, key: &str) -> Subscription<Option<Value>> {
        self.inner.subscribe_document(collection, key)
    }
}

/// Suggester returning a fixed answer and counting calls.
#[derive(Default)]
pub(crate) struct StaticSuggester {
    answer: Option<Vec<String>>,
    calls: AtomicUsize,
}

impl StaticSuggester {
    pub(crate) fn returning(tasks: &[&str]) -> Self {
        Self {
            answer: Some(tasks.iter().map(ToString::to_string).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails with `EmptySuggestions`.
    pub(crate) fn failing() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuggestTasks for StaticSuggester {
    async fn suggest_tasks(&self, _trade: &str) -> Result<Vec<String>, SuggestionError> {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().ok_or(SuggestionError::EmptySuggestions)
    }
}

/// Suggester whose requests never complete, like a stalled gateway.
pub(crate) struct PendingSuggester;

#[async_trait]
impl SuggestTasks for PendingSuggester {
    async fn suggest_tasks(&self, _trade: &str) -> Result<Vec<String>, SuggestionError> {
        std::future::pending().await
    }
}
