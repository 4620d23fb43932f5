//! Application controller: navigation state and the live feed.
//!
//! The controller is in one of two views. `Home` shows every unit;
//! `UnitDetail(id)` shows one. Selecting a unit from `Home` and going back
//! from `UnitDetail` are the only transitions; anything else is rejected.
//!
//! The controller owns exactly one [`Subscription`] matching its view. On a
//! view change the old feed is dropped (cancelled) before the new one is
//! opened, and dropping the controller cancels whatever is live. Actions run
//! through a detached [`Actions`] handle and never update local state
//! directly: writes go to the store, and the resulting snapshot arrives
//! through [`Controller::next_update`].

use std::fmt;
use std::sync::Arc;

use punch_core::{Unit, UnitId};
use punch_llm::SuggestTasks;
use punch_settings::LinkSettings;
use punch_store::Subscription;
use tokio::sync::broadcast;
use tracing::debug;

use crate::actions::Actions;
use crate::errors::ControllerError;
use crate::notices::{Notice, NoticeEmitter, NoticeKind};
use crate::repository::UnitRepository;

/// Result alias for navigation.
pub type Result<T> = std::result::Result<T, ControllerError>;

/// Current screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    /// Unit list.
    Home,
    /// One unit's checklist.
    UnitDetail(UnitId),
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::UnitDetail(id) => write!(f, "unit {id}"),
        }
    }
}

/// What a snapshot changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Update {
    /// The unit list was replaced.
    Units,
    /// The selected unit was replaced.
    Unit,
    /// The selected unit does not exist.
    UnitMissing,
}

enum Feed {
    Units(Subscription<Vec<Unit>>),
    Unit(Subscription<Option<Unit>>),
}

/// Owns navigation state and the live subscription for the current view.
pub struct Controller {
    actions: Actions,
    view: View,
    feed: Option<Feed>,
    units: Vec<Unit>,
    selected_unit: Option<Unit>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("view", &self.view)
            .field("units", &self.units)
            .field("selected_unit", &self.selected_unit)
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Create a controller. Starts on the unit's detail view when `initial`
    /// names one, on `Home` otherwise, with the matching feed open.
    pub fn new(
        repo: Arc<UnitRepository>,
        suggester: Arc<dyn SuggestTasks>,
        link: LinkSettings,
        initial: Option<UnitId>,
    ) -> Self {
        let view = initial.map_or(View::Home, View::UnitDetail);
        let mut controller = Self {
            actions: Actions::new(repo, suggester, link, NoticeEmitter::new()),
            view: View::Home,
            feed: None,
            units: Vec::new(),
            selected_unit: None,
        };
        controller.enter(view);
        controller
    }

    // ── State ───────────────────────────────────────────────────────────

    /// Current view.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Last unit list received (home view).
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Last snapshot of the selected unit (detail view).
    pub fn selected_unit(&self) -> Option<&Unit> {
        self.selected_unit.as_ref()
    }

    /// Whether a live feed is open.
    pub fn has_feed(&self) -> bool {
        self.feed.is_some()
    }

    /// Receive every notice raised after this call.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.actions.notices().subscribe()
    }

    /// The repository actions go through.
    pub fn repository(&self) -> &UnitRepository {
        self.actions.repository()
    }

    /// Action handle for the current view, targeting the selected unit in
    /// detail view and no unit on `Home`.
    ///
    /// The handle is independent of the controller: its futures may stay
    /// pending while [`Controller::next_update`] keeps running.
    pub fn actions(&self) -> Actions {
        let unit = match &self.view {
            View::UnitDetail(id) => Some(id.clone()),
            View::Home => None,
        };
        self.actions.for_unit(unit)
    }

    // ── Feed ────────────────────────────────────────────────────────────

    /// Wait for the next snapshot of the current view and apply it.
    ///
    /// Snapshots queued behind it are skipped in favour of the newest.
    /// Returns `None` when no feed is open or the feed has ended. Dropping
    /// the returned future loses no snapshot.
    pub async fn next_update(&mut self) -> Option<Update> {
        match self.feed.as_mut()? {
            Feed::Units(sub) => {
                let units = sub.latest().await?;
                debug!(count = units.len(), "unit list snapshot");
                self.units = units;
                Some(Update::Units)
            }
            Feed::Unit(sub) => match sub.latest().await? {
                Some(unit) => {
                    self.selected_unit = Some(unit);
                    Some(Update::Unit)
                }
                None => {
                    self.selected_unit = None;
                    let message = match &self.view {
                        View::UnitDetail(id) => format!("unit '{id}' not found"),
                        View::Home => "unit not found".to_string(),
                    };
                    let _ = self
                        .actions
                        .notices()
                        .emit(Notice::new(NoticeKind::NotFound, message));
                    Some(Update::UnitMissing)
                }
            },
        }
    }

    fn enter(&mut self, view: View) {
        // Cancel the old feed before opening the next one.
        self.feed = None;
        let repo = self.actions.repository();
        let feed = match &view {
            View::Home => Feed::Units(repo.list_units()),
            View::UnitDetail(id) => {
                self.selected_unit = None;
                Feed::Unit(repo.get_unit(id))
            }
        };
        debug!(from = %self.view, to = %view, "view changed");
        self.view = view;
        self.feed = Some(feed);
    }

    // ── Navigation ──────────────────────────────────────────────────────

    /// `Home → UnitDetail(id)`.
    pub fn select_unit(&mut self, id: impl Into<UnitId>) -> Result<()> {
        let id = id.into();
        if id.trim().is_empty() {
            return self
                .actions
                .fail(ControllerError::Validation("unit name is required".into()));
        }
        if self.view != View::Home {
            return self.actions.fail(ControllerError::InvalidNavigation {
                action: "select a unit",
                from: self.view.to_string(),
            });
        }
        self.enter(View::UnitDetail(id));
        Ok(())
    }

    /// `UnitDetail(id) → Home`.
    pub fn back(&mut self) -> Result<()> {
        if self.view == View::Home {
            return self.actions.fail(ControllerError::InvalidNavigation {
                action: "go back",
                from: self.view.to_string(),
            });
        }
        self.selected_unit = None;
        self.enter(View::Home);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
