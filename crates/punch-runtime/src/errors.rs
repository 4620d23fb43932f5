//! Repository and controller errors.

use punch_core::{TaskLookupError, UnitId};
use punch_llm::SuggestionError;
use punch_store::StoreError;
use thiserror::Error;

use crate::notices::NoticeKind;

/// Errors from [`UnitRepository`](crate::UnitRepository) operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unit with this name already exists.
    #[error("unit '{0}' already exists")]
    AlreadyExists(UnitId),

    /// No unit with this name exists (or it vanished before the write).
    #[error("unit '{0}' not found")]
    UnitNotFound(UnitId),

    /// The positional task reference no longer resolves.
    #[error(transparent)]
    Task(#[from] TaskLookupError),

    /// A stored unit document could not be decoded.
    #[error("unit '{unit}' is not a valid unit document: {source}")]
    Decode {
        /// Document key.
        unit: UnitId,
        /// Decode failure.
        source: serde_json::Error,
    },

    /// A unit or trades map could not be encoded.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from [`Controller`](crate::Controller) actions and bootstrap.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Sign-in or startup failed. Fatal.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// User input was rejected before reaching the store.
    #[error("{0}")]
    Validation(String),

    /// The requested navigation is not a transition from the current view.
    #[error("cannot {action} from {from}")]
    InvalidNavigation {
        /// Requested transition.
        action: &'static str,
        /// Current view.
        from: String,
    },

    /// A unit-scoped action was requested on the home view.
    #[error("no unit is selected")]
    NoUnitSelected,

    /// A repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The suggestion gateway failed.
    #[error("task suggestions failed: {0}")]
    Suggestion(#[from] SuggestionError),
}

impl ControllerError {
    /// Notice category this error is reported under.
    pub fn kind(&self) -> NoticeKind {
        match self {
            Self::Initialization(_) => NoticeKind::Initialization,
            Self::Validation(_) | Self::InvalidNavigation { .. } | Self::NoUnitSelected => {
                NoticeKind::Validation
            }
            Self::Suggestion(_) => NoticeKind::Suggestion,
            Self::Repository(RepositoryError::UnitNotFound(_) | RepositoryError::Task(_)) => {
                NoticeKind::NotFound
            }
            Self::Repository(_) => NoticeKind::Write,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_cause() {
        let not_found = ControllerError::from(RepositoryError::UnitNotFound("A-1".into()));
        assert_eq!(not_found.kind(), NoticeKind::NotFound);

        let stale = ControllerError::from(RepositoryError::Task(TaskLookupError::TradeNotFound(
            "Roofing".into(),
        )));
        assert_eq!(stale.kind(), NoticeKind::NotFound);

        let exists = ControllerError::from(RepositoryError::AlreadyExists("A-1".into()));
        assert_eq!(exists.kind(), NoticeKind::Write);

        let store = ControllerError::from(RepositoryError::Store(StoreError::Unavailable(
            "offline".into(),
        )));
        assert_eq!(store.kind(), NoticeKind::Write);

        assert_eq!(
            ControllerError::from(SuggestionError::EmptySuggestions).kind(),
            NoticeKind::Suggestion
        );
        assert_eq!(ControllerError::NoUnitSelected.kind(), NoticeKind::Validation);
        assert_eq!(
            ControllerError::Initialization("x".into()).kind(),
            NoticeKind::Initialization
        );
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            RepositoryError::AlreadyExists("A-1".into()).to_string(),
            "unit 'A-1' already exists"
        );
        let nav = ControllerError::InvalidNavigation {
            action: "go back",
            from: "home".into(),
        };
        assert_eq!(nav.to_string(), "cannot go back from home");
    }
}
