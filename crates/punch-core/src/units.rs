//! Unit and task checklist types.
//!
//! A [`Unit`] is stored as one schemaless document keyed by its name. Its
//! `trades` field maps a trade name to an ordered list of [`Task`]s. Tasks have
//! no identifier of their own: a task is addressed by its position inside its
//! trade, so any insertion or removal shifts the tasks after it.
//!
//! The helpers in this module are pure: they mutate an in-memory [`Trades`]
//! map and leave persistence (always a whole-map write) to the repository.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::UnitId;

/// Status label written when a unit is created.
pub const STATUS_NOT_STARTED: &str = "Not Started";

/// Canned checklist for a new unit: five trades with two tasks each.
///
/// The order here is also the display order of trades.
pub const DEFAULT_TRADES: [(&str, [&str; 2]); 5] = [
    ("Electrical", ["Rough-in wiring", "Fixture installation"]),
    ("Plumbing", ["Rough-in plumbing", "Fixture hookup"]),
    ("Drywall", ["Hang drywall", "Tape and finish"]),
    ("Painting", ["Prime walls", "Final coat"]),
    ("Flooring", ["Subfloor preparation", "Floor installation"]),
];

/// Mapping from trade name to its ordered task list.
pub type Trades = BTreeMap<String, Vec<Task>>;

/// A single checklist item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Free-text description.
    pub task: String,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create an incomplete task.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            task: text.into(),
            completed: false,
        }
    }
}

/// A construction unit (apartment or house) and its per-trade checklist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique name; doubles as the document key.
    #[serde(default)]
    pub name: String,
    /// Free-text street address.
    #[serde(default)]
    pub address: String,
    /// Free-text status label. Never derived from task completion.
    #[serde(default)]
    pub status: String,
    /// Per-trade task lists.
    #[serde(default)]
    pub trades: Trades,
}

impl Unit {
    /// Build a new unit with status `"Not Started"` and the default trades.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            status: STATUS_NOT_STARTED.to_string(),
            trades: default_trades(),
        }
    }

    /// The unit's identifier.
    #[must_use]
    pub fn id(&self) -> UnitId {
        UnitId::new(self.name.clone())
    }

    /// Tasks of a trade. A trade absent from the map has zero tasks.
    #[must_use]
    pub fn tasks(&self, trade: &str) -> &[Task] {
        self.trades.get(trade).map_or(&[], Vec::as_slice)
    }

    /// Trade names in display order: the default trades first (in their canonical
    /// order, when present), then any others lexically.
    #[must_use]
    pub fn trade_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = DEFAULT_TRADES
            .iter()
            .map(|(trade, _)| *trade)
            .filter(|trade| self.trades.contains_key(*trade))
            .collect();
        names.extend(
            self.trades
                .keys()
                .map(String::as_str)
                .filter(|k| !DEFAULT_TRADES.iter().any(|(trade, _)| trade == k)),
        );
        names
    }

    /// Completed vs. total task counts across all trades.
    #[must_use]
    pub fn progress(&self) -> Progress {
        let (completed, total) = self
            .trades
            .values()
            .flatten()
            .fold((0, 0), |(done, all), t| (done + usize::from(t.completed), all + 1));
        Progress { completed, total }
    }
}

/// Task completion counts for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    /// Tasks marked complete.
    pub completed: usize,
    /// All tasks.
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

/// The default trades map for a freshly created unit.
#[must_use]
pub fn default_trades() -> Trades {
    DEFAULT_TRADES
        .iter()
        .map(|(trade, tasks)| {
            (
                (*trade).to_string(),
                tasks.iter().map(|t| Task::new(*t)).collect(),
            )
        })
        .collect()
}

/// A positional task reference that no longer resolves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskLookupError {
    /// The trade key is missing from the unit.
    #[error("trade '{0}' not found")]
    TradeNotFound(String),
    /// The index is past the end of the trade's task list.
    #[error("task #{index} out of range for trade '{trade}' ({len} tasks)")]
    IndexOutOfRange {
        /// Trade name.
        trade: String,
        /// Requested position.
        index: usize,
        /// Current number of tasks.
        len: usize,
    },
}

/// Resolve `trades[trade][index]` for in-place mutation.
pub fn task_mut<'a>(
    trades: &'a mut Trades,
    trade: &str,
    index: usize,
) -> Result<&'a mut Task, TaskLookupError> {
    let tasks = trades
        .get_mut(trade)
        .ok_or_else(|| TaskLookupError::TradeNotFound(trade.to_string()))?;
    let len = tasks.len();
    tasks
        .get_mut(index)
        .ok_or_else(|| TaskLookupError::IndexOutOfRange {
            trade: trade.to_string(),
            index,
            len,
        })
}

/// Append an incomplete task at the end of a trade, creating the trade if
/// absent. Returns the trade's new task count.
pub fn append_task(trades: &mut Trades, trade: &str, text: impl Into<String>) -> usize {
    let tasks = trades.entry(trade.to_string()).or_default();
    tasks.push(Task::new(text));
    tasks.len()
}

/// Suggestions whose text matches no existing task exactly (case-sensitive).
///
/// Repeats inside the batch are kept only once, in first-seen order.
#[must_use]
pub fn fresh_suggestions(existing: &[Task], suggestions: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = existing.iter().map(|t| t.task.as_str()).collect();
    suggestions
        .iter()
        .filter(|s| seen.insert(s.as_str()))
        .cloned()
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
