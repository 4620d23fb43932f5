//! User actions, detached from the controller's live feed.
//!
//! An [`Actions`] handle is a cheap clone of everything an action needs: the
//! repository, the suggestion gateway, link settings, the notice channel and
//! the unit the action targets. Callers take one from
//! [`Controller::actions`](crate::Controller::actions) and may keep several
//! actions in flight while the controller goes on applying snapshots. A
//! stalled gateway call only holds up its own future.

use std::sync::Arc;

use punch_core::link::share_link;
use punch_core::{Unit, UnitId};
use punch_llm::SuggestTasks;
use punch_settings::LinkSettings;
use tracing::{info, warn};

use crate::bulk::{BulkReport, generate_buildings};
use crate::errors::ControllerError;
use crate::metrics::{SUGGESTION_FAILURES_TOTAL, SUGGESTION_REQUESTS_TOTAL, UNITS_CREATED_TOTAL};
use crate::notices::{Notice, NoticeEmitter, NoticeKind};
use crate::repository::{AppendOutcome, UnitRepository};

/// Result alias for actions.
pub type Result<T> = std::result::Result<T, ControllerError>;

/// Action handle bound to one unit (or to none, on the home view).
///
/// Every failure is emitted as a [`Notice`] and also returned.
#[derive(Clone)]
pub struct Actions {
    repo: Arc<UnitRepository>,
    suggester: Arc<dyn SuggestTasks>,
    link: Arc<LinkSettings>,
    notices: NoticeEmitter,
    unit: Option<UnitId>,
}

impl Actions {
    /// Handle with no unit selected.
    pub fn new(
        repo: Arc<UnitRepository>,
        suggester: Arc<dyn SuggestTasks>,
        link: LinkSettings,
        notices: NoticeEmitter,
    ) -> Self {
        Self {
            repo,
            suggester,
            link: Arc::new(link),
            notices,
            unit: None,
        }
    }

    /// The same handle targeting `unit`.
    #[must_use]
    pub fn for_unit(&self, unit: Option<UnitId>) -> Self {
        Self {
            unit,
            ..self.clone()
        }
    }

    /// Unit that unit-scoped actions apply to.
    pub fn unit(&self) -> Option<&UnitId> {
        self.unit.as_ref()
    }

    pub(crate) fn repository(&self) -> &UnitRepository {
        &self.repo
    }

    pub(crate) fn notices(&self) -> &NoticeEmitter {
        &self.notices
    }

    /// Create a unit. Blank names or addresses are rejected.
    pub async fn add_unit(&self, name: &str, address: &str) -> Result<Unit> {
        let (name, address) = (name.trim(), address.trim());
        if name.is_empty() || address.is_empty() {
            return self.fail(ControllerError::Validation(
                "unit name and address are required".into(),
            ));
        }
        let unit = self.report(self.repo.create_unit(name, address).await)?;
        ::metrics::counter!(UNITS_CREATED_TOTAL, "source" => "manual").increment(1);
        let _ = self
            .notices
            .emit(Notice::info(format!("unit '{}' added", unit.name)));
        Ok(unit)
    }

    /// Set a task's completion flag on the target unit.
    pub async fn set_task_completed(
        &self,
        trade: &str,
        index: usize,
        completed: bool,
    ) -> Result<()> {
        let id = self.current_unit()?;
        self.report(
            self.repo
                .set_task_completed(&id, trade, index, completed)
                .await,
        )
    }

    /// Flip a task on the target unit. Returns the new flag.
    pub async fn toggle_task(&self, trade: &str, index: usize) -> Result<bool> {
        let id = self.current_unit()?;
        self.report(self.repo.toggle_task(&id, trade, index).await)
    }

    /// Append a task to a trade of the target unit. Blank text is rejected.
    pub async fn add_task(&self, trade: &str, text: &str) -> Result<usize> {
        let id = self.current_unit()?;
        let (trade, text) = (trade.trim(), text.trim());
        if trade.is_empty() || text.is_empty() {
            return self.fail(ControllerError::Validation(
                "trade and task text are required".into(),
            ));
        }
        self.report(self.repo.add_task(&id, trade, text).await)
    }

    /// Ask the suggestion gateway for tasks and append the new ones.
    pub async fn suggest_tasks(&self, trade: &str) -> Result<AppendOutcome> {
        let id = self.current_unit()?;
        let trade = trade.trim();
        if trade.is_empty() {
            return self.fail(ControllerError::Validation("trade is required".into()));
        }

        ::metrics::counter!(SUGGESTION_REQUESTS_TOTAL).increment(1);
        let suggestions = match self.suggester.suggest_tasks(trade).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!(trade, error = %e, "task suggestion failed");
                ::metrics::counter!(SUGGESTION_FAILURES_TOTAL, "reason" => e.reason())
                    .increment(1);
                return self.fail(e.into());
            }
        };

        let outcome = self.report(
            self.repo
                .append_suggested_tasks(&id, trade, &suggestions)
                .await,
        )?;
        let message = match &outcome {
            AppendOutcome::Appended { added, .. } => {
                format!("added {} suggested task(s) to {trade}", added.len())
            }
            AppendOutcome::NothingNew => format!("no new suggestions for {trade}"),
        };
        let _ = self.notices.emit(Notice::info(message));
        Ok(outcome)
    }

    /// Run bulk generation. A halted run is reported as a write notice.
    pub async fn generate_buildings(&self) -> BulkReport {
        let report = generate_buildings(&self.repo).await;
        let notice = match &report.failure {
            None => Notice::info(format!("generated {} units", report.created.len())),
            Some(failure) => Notice::new(
                NoticeKind::Write,
                format!(
                    "bulk generation stopped at '{}' after {} units: {}",
                    failure.unit,
                    report.created.len(),
                    failure.error
                ),
            ),
        };
        let _ = self.notices.emit(notice);
        report
    }

    /// Shareable link to the target unit.
    pub fn share_link(&self) -> Result<String> {
        let id = self.current_unit()?;
        Ok(share_link(&self.link.base_url, &self.link.param, &id))
    }

    fn current_unit(&self) -> Result<UnitId> {
        match &self.unit {
            Some(id) => Ok(id.clone()),
            None => self.fail(ControllerError::NoUnitSelected),
        }
    }

    pub(crate) fn fail<T>(&self, err: ControllerError) -> Result<T> {
        info!(kind = %err.kind(), error = %err, "action rejected");
        let _ = self.notices.emit(Notice::from(&err));
        Err(err)
    }

    fn report<T, E>(&self, result: std::result::Result<T, E>) -> Result<T>
    where
        E: Into<ControllerError>,
    {
        result.or_else(|e| self.fail(e.into()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use punch_store::MemoryStore;
    use tokio::sync::broadcast;

    use super::*;
    use crate::errors::RepositoryError;
    use crate::testutil::{StaticSuggester, test_identity};

    struct Harness {
        store: MemoryStore,
        repo: Arc<UnitRepository>,
        notices: NoticeEmitter,
    }

    impl Harness {
        fn new() -> Self {
            let store = MemoryStore::new();
            let repo = Arc::new(UnitRepository::new(
                Arc::new(store.clone()),
                "ns",
                test_identity(),
            ));
            Self {
                store,
                repo,
                notices: NoticeEmitter::new(),
            }
        }

        async fn with_unit() -> Self {
            let h = Self::new();
            let _ = h.repo.create_unit("A-1", "123 Main").await.unwrap();
            h
        }

        fn actions(&self, suggester: Arc<dyn SuggestTasks>, unit: Option<&str>) -> Actions {
            Actions::new(
                Arc::clone(&self.repo),
                suggester,
                LinkSettings::default(),
                self.notices.clone(),
            )
            .for_unit(unit.map(UnitId::from))
        }

        fn subscribe(&self) -> broadcast::Receiver<Notice> {
            self.notices.subscribe()
        }
    }

    fn failing() -> Arc<dyn SuggestTasks> {
        Arc::new(StaticSuggester::failing())
    }

    fn kinds(rx: &mut broadcast::Receiver<Notice>) -> Vec<NoticeKind> {
        std::iter::from_fn(|| rx.try_recv().ok())
            .map(|n| n.kind)
            .collect()
    }

    #[tokio::test]
    async fn add_unit_rejects_blank_and_duplicates() {
        let h = Harness::new();
        let actions = h.actions(failing(), None);
        let mut notices = h.subscribe();

        assert_matches!(
            actions.add_unit("  ", "x").await,
            Err(ControllerError::Validation(_))
        );
        assert_matches!(
            actions.add_unit("A-1", "").await,
            Err(ControllerError::Validation(_))
        );
        assert_eq!(h.store.document_count("ns/units"), 0);

        let unit = actions.add_unit(" A-1 ", "123 Main").await.unwrap();
        assert_eq!(unit.name, "A-1");
        assert_matches!(
            actions.add_unit("A-1", "again").await,
            Err(ControllerError::Repository(RepositoryError::AlreadyExists(_)))
        );

        assert_eq!(
            kinds(&mut notices),
            [
                NoticeKind::Validation,
                NoticeKind::Validation,
                NoticeKind::Info,
                NoticeKind::Write
            ]
        );
    }

    #[tokio::test]
    async fn unit_actions_need_a_target() {
        let h = Harness::new();
        let actions = h.actions(failing(), None);
        assert!(actions.unit().is_none());
        assert_matches!(
            actions.toggle_task("Electrical", 0).await,
            Err(ControllerError::NoUnitSelected)
        );
        assert_matches!(actions.share_link(), Err(ControllerError::NoUnitSelected));
    }

    #[tokio::test]
    async fn stale_task_index_is_not_found() {
        let h = Harness::with_unit().await;
        let actions = h.actions(failing(), Some("A-1"));
        let mut notices = h.subscribe();
        assert_matches!(
            actions.toggle_task("Painting", 9).await,
            Err(ControllerError::Repository(RepositoryError::Task(_)))
        );
        assert_eq!(notices.recv().await.unwrap().kind, NoticeKind::NotFound);
    }

    #[tokio::test]
    async fn suggest_tasks_appends_only_new() {
        let h = Harness::with_unit().await;
        let actions = h.actions(
            Arc::new(StaticSuggester::returning(&[
                "Rough-in wiring",
                "Install conduit",
            ])),
            Some("A-1"),
        );
        let outcome = actions.suggest_tasks("Electrical").await.unwrap();
        assert_eq!(
            outcome,
            AppendOutcome::Appended {
                added: vec!["Install conduit".into()],
                total: 3
            }
        );

        let again = actions.suggest_tasks("Electrical").await.unwrap();
        assert_eq!(again, AppendOutcome::NothingNew);
    }

    #[tokio::test]
    async fn suggestion_failure_is_surfaced_without_write() {
        let h = Harness::with_unit().await;
        let actions = h.actions(failing(), Some("A-1"));
        let mut notices = h.subscribe();

        assert_matches!(
            actions.suggest_tasks("Plumbing").await,
            Err(ControllerError::Suggestion(_))
        );
        assert_eq!(notices.recv().await.unwrap().kind, NoticeKind::Suggestion);
        let unit = h.repo.fetch_unit("A-1").await.unwrap();
        assert_eq!(unit.tasks("Plumbing").len(), 2);
    }

    #[tokio::test]
    async fn suggest_blank_trade_skips_gateway() {
        let h = Harness::new();
        let suggester = Arc::new(StaticSuggester::returning(&["x"]));
        let actions = h.actions(
            Arc::clone(&suggester) as Arc<dyn SuggestTasks>,
            Some("A-1"),
        );
        assert_matches!(
            actions.suggest_tasks(" ").await,
            Err(ControllerError::Validation(_))
        );
        assert_eq!(suggester.calls(), 0);
    }

    #[tokio::test]
    async fn share_link_encodes_target_unit() {
        let h = Harness::new();
        let actions = h.actions(failing(), Some("A 1"));
        assert_eq!(
            actions.share_link().unwrap(),
            "https://punchlist.local/app?unit=A%201"
        );
    }

    #[tokio::test]
    async fn generate_buildings_reports_through_notices() {
        let h = Harness::new();
        let actions = h.actions(failing(), None);
        let mut notices = h.subscribe();
        let report = actions.generate_buildings().await;
        assert!(report.is_complete());
        assert_eq!(h.store.document_count("ns/units"), 80);
        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert_eq!(notice.message, "generated 80 units");
    }

    #[tokio::test]
    async fn counters_carry_source_and_reason() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let _guard = ::metrics::set_default_local_recorder(&recorder);

        let h = Harness::new();
        let actions = h.actions(failing(), None);
        let _ = actions.add_unit("A-1", "123 Main").await.unwrap();
        let _ = actions
            .for_unit(Some("A-1".into()))
            .suggest_tasks("Drywall")
            .await
            .unwrap_err();
        let _ = actions.toggle_task("Drywall", 0).await.unwrap_err();

        let output = recorder.handle().render();
        assert!(output.contains(r#"units_created_total{source="manual"} 1"#), "{output}");
        assert!(output.contains("suggestion_requests_total 1"), "{output}");
        assert!(
            output.contains(r#"suggestion_failures_total{reason="empty"} 1"#),
            "{output}"
        );
    }

    #[test]
    fn clones_share_the_notice_channel() {
        let h = Harness::new();
        let mut notices = h.subscribe();
        let actions = h.actions(failing(), None).for_unit(Some("B-2".into()));
        assert_eq!(actions.unit().map(UnitId::as_str), Some("B-2"));
        let _ = actions.share_link().unwrap();
        let _ = actions.for_unit(None).share_link().unwrap_err();
        assert_eq!(kinds(&mut notices), [NoticeKind::Validation]);
    }
}
