//! Unit repository over a [`DocumentStore`].
//!
//! Units live in `<namespace>/units`, one document per unit keyed by its
//! name. Task mutations read the latest stored unit, change it in memory,
//! then write the complete `trades` map back as a single field replacement.
//! The read and the write are separate store calls, so a concurrent writer
//! between them is overwritten (last write wins on the whole map).

use std::sync::Arc;

use punch_core::units::{append_task, fresh_suggestions, task_mut};
use punch_core::{Trades, Unit, UnitId};
use punch_store::{
    CollectionSnapshot, DocumentStore, Identity, StoreError, Subscription, collection_path,
};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::errors::RepositoryError;
use crate::metrics::TASK_WRITES_TOTAL;

/// Collection name under the namespace.
pub const UNITS_COLLECTION: &str = "units";

/// Result alias for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Outcome of [`UnitRepository::append_suggested_tasks`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppendOutcome {
    /// New tasks were appended and written.
    Appended {
        /// Texts that were appended, in order.
        added: Vec<String>,
        /// Task count of the trade after the append.
        total: usize,
    },
    /// Every suggestion already existed; nothing was written.
    NothingNew,
}

/// Reads and mutates unit documents.
pub struct UnitRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
    identity: Identity,
}

impl UnitRepository {
    /// Repository for `<namespace>/units`, acting as `identity`.
    pub fn new(store: Arc<dyn DocumentStore>, namespace: &str, identity: Identity) -> Self {
        Self {
            store,
            collection: collection_path(namespace, UNITS_COLLECTION),
            identity,
        }
    }

    /// Full collection path.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Identity writes are made as.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Create a unit with status `"Not Started"` and the default trades.
    ///
    /// Fails with [`RepositoryError::AlreadyExists`] when the name is taken.
    /// The existence check is a separate read, not part of the write.
    #[instrument(skip_all, fields(unit = name, uid = %self.identity.uid))]
    pub async fn create_unit(&self, name: &str, address: &str) -> Result<Unit> {
        if self.store.get_document(&self.collection, name).await?.is_some() {
            return Err(RepositoryError::AlreadyExists(UnitId::new(name)));
        }
        let unit = Unit::new(name, address);
        let value = serde_json::to_value(&unit)?;
        self.store
            .set_document(&self.collection, name, value)
            .await?;
        info!("unit created");
        Ok(unit)
    }

    /// Live list of every unit. Undecodable documents are skipped.
    pub fn list_units(&self) -> Subscription<Vec<Unit>> {
        self.store
            .subscribe_collection(&self.collection)
            .map(decode_snapshot)
    }

    /// Live view of one unit; `None` while it does not exist.
    pub fn get_unit(&self, name: &str) -> Subscription<Option<Unit>> {
        let key = name.to_string();
        self.store
            .subscribe_document(&self.collection, name)
            .map(move |doc| {
                let value = doc?;
                match decode_unit(&key, value) {
                    Ok(unit) => Some(unit),
                    Err(e) => {
                        warn!(unit = %key, error = %e, "skipping undecodable unit document");
                        None
                    }
                }
            })
    }

    /// One-shot read of the latest stored unit.
    pub async fn fetch_unit(&self, name: &str) -> Result<Unit> {
        let value = self
            .store
            .get_document(&self.collection, name)
            .await?
            .ok_or_else(|| RepositoryError::UnitNotFound(UnitId::new(name)))?;
        decode_unit(name, value).map_err(|source| RepositoryError::Decode {
            unit: UnitId::new(name),
            source,
        })
    }

    /// Set `trades[trade][index].completed` and write the trades back.
    #[instrument(skip_all, fields(unit = name, trade = trade, index = index, completed = completed))]
    pub async fn set_task_completed(
        &self,
        name: &str,
        trade: &str,
        index: usize,
        completed: bool,
    ) -> Result<()> {
        let mut unit = self.fetch_unit(name).await?;
        task_mut(&mut unit.trades, trade, index)?.completed = completed;
        self.write_trades(name, &unit.trades, "set_completed").await
    }

    /// Flip a task's stored completion flag. Returns the new value.
    #[instrument(skip_all, fields(unit = name, trade = trade, index = index))]
    pub async fn toggle_task(&self, name: &str, trade: &str, index: usize) -> Result<bool> {
        let mut unit = self.fetch_unit(name).await?;
        let task = task_mut(&mut unit.trades, trade, index)?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.write_trades(name, &unit.trades, "toggle").await?;
        Ok(completed)
    }

    /// Append an incomplete task to a trade, creating the trade if absent.
    /// Returns the trade's new task count.
    #[instrument(skip_all, fields(unit = name, trade = trade))]
    pub async fn add_task(&self, name: &str, trade: &str, text: &str) -> Result<usize> {
        let mut unit = self.fetch_unit(name).await?;
        let len = append_task(&mut unit.trades, trade, text);
        self.write_trades(name, &unit.trades, "add").await?;
        Ok(len)
    }

    /// Append the suggestions not already present in the trade.
    ///
    /// Matching is exact and case-sensitive. When nothing is new the unit is
    /// left untouched and no write happens.
    #[instrument(skip_all, fields(unit = name, trade = trade, offered = suggestions.len()))]
    pub async fn append_suggested_tasks(
        &self,
        name: &str,
        trade: &str,
        suggestions: &[String],
    ) -> Result<AppendOutcome> {
        let mut unit = self.fetch_unit(name).await?;
        let added = fresh_suggestions(unit.tasks(trade), suggestions);
        if added.is_empty() {
            debug!("no new suggestions");
            return Ok(AppendOutcome::NothingNew);
        }
        let mut total = 0;
        for text in &added {
            total = append_task(&mut unit.trades, trade, text.as_str());
        }
        self.write_trades(name, &unit.trades, "suggest").await?;
        Ok(AppendOutcome::Appended { added, total })
    }

    async fn write_trades(&self, name: &str, trades: &Trades, op: &'static str) -> Result<()> {
        let mut fields = Map::new();
        let _ = fields.insert("trades".to_string(), serde_json::to_value(trades)?);
        self.store
            .update_fields(&self.collection, name, fields)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => RepositoryError::UnitNotFound(UnitId::new(name)),
                other => RepositoryError::Store(other),
            })?;
        debug!(op, "trades written");
        ::metrics::counter!(TASK_WRITES_TOTAL, "op" => op).increment(1);
        Ok(())
    }
}

/// Decode a unit document. A missing `name` falls back to the key.
fn decode_unit(key: &str, value: Value) -> std::result::Result<Unit, serde_json::Error> {
    let mut unit: Unit = serde_json::from_value(value)?;
    if unit.name.is_empty() {
        unit.name = key.to_string();
    }
    Ok(unit)
}

fn decode_snapshot(snapshot: CollectionSnapshot) -> Vec<Unit> {
    snapshot
        .into_iter()
        .filter_map(|entry| match decode_unit(&entry.key, entry.value) {
            Ok(unit) => Some(unit),
            Err(e) => {
                warn!(unit = %entry.key, error = %e, "skipping undecodable unit document");
                None
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
