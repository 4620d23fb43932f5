//! User-visible notices and their broadcast fan-out.
//!
//! Every controller outcome worth surfacing (failures and a few
//! confirmations) becomes a [`Notice`]. Renderers subscribe to the
//! [`NoticeEmitter`]; emitting never blocks and slow receivers lag.

use std::fmt;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::errors::ControllerError;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 256;

/// Notice category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Startup failed; nothing else will work.
    Initialization,
    /// A store write failed.
    Write,
    /// A unit or task reference did not resolve.
    NotFound,
    /// The suggestion gateway failed.
    Suggestion,
    /// Input or navigation was rejected.
    Validation,
    /// Informational confirmation.
    Info,
}

impl NoticeKind {
    /// Short label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialization => "initialization",
            Self::Write => "write",
            Self::NotFound => "not-found",
            Self::Suggestion => "suggestion",
            Self::Validation => "validation",
            Self::Info => "info",
        }
    }

    /// Whether this kind reports a failure.
    pub fn is_error(self) -> bool {
        !matches!(self, Self::Info)
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Category.
    pub kind: NoticeKind,
    /// Human-readable text.
    pub message: String,
    /// When the notice was raised.
    pub at: DateTime<Utc>,
}

impl Notice {
    /// Create a notice stamped now.
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            at: Utc::now(),
        }
    }

    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }
}

impl From<&ControllerError> for Notice {
    fn from(err: &ControllerError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

/// Broadcast-based notice emitter. Clones share one channel.
#[derive(Clone)]
pub struct NoticeEmitter {
    tx: broadcast::Sender<Notice>,
}

impl NoticeEmitter {
    /// Create an emitter with the default channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an emitter with a custom channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit to all subscribers. Returns how many received it.
    pub fn emit(&self, notice: Notice) -> usize {
        self.tx.send(notice).unwrap_or(0)
    }

    /// Receive every notice emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }
}

impl Default for NoticeEmitter {
    fn default() -> Self {
        Self::new()
    }
}
