//! Startup: sign in, then build the repository and controller.

use std::sync::Arc;

use punch_core::link::unit_from_link;
use punch_llm::google::{GeminiConfig, GeminiSuggester};
use punch_llm::{SuggestTasks, UnconfiguredSuggester};
use punch_settings::{PunchSettings, SuggestionSettings};
use punch_store::{DocumentStore, Identity, IdentityProvider};
use tracing::{error, info, instrument};

use crate::controller::Controller;
use crate::errors::ControllerError;
use crate::repository::UnitRepository;

/// Suggester for the configured gateway: Gemini when enabled with an API
/// key, [`UnconfiguredSuggester`] otherwise.
pub fn suggester_from_settings(settings: &SuggestionSettings) -> Arc<dyn SuggestTasks> {
    match settings.usable_api_key() {
        Some(key) => Arc::new(GeminiSuggester::new(GeminiConfig {
            model: settings.model.clone(),
            api_key: key.to_string(),
            base_url: Some(settings.base_url.clone()),
        })),
        None => {
            info!("task suggestions disabled: no API key configured");
            Arc::new(UnconfiguredSuggester)
        }
    }
}

/// Sign in with the configured token, or anonymously without one.
async fn sign_in(
    settings: &PunchSettings,
    identity: &dyn IdentityProvider,
) -> Result<Identity, ControllerError> {
    let token = settings
        .auth
        .token
        .as_deref()
        .filter(|t| !t.trim().is_empty());
    let result = match token {
        Some(token) => identity.sign_in_with_token(token).await,
        None => identity.sign_in_anonymous().await,
    };
    result.map_err(|e| {
        error!(error = %e, "sign-in failed");
        ControllerError::Initialization(e.to_string())
    })
}

/// Sign in and build a controller for `<namespace>/units`.
///
/// The initial view is the unit named by `link`, if any. A sign-in failure
/// is an [`ControllerError::Initialization`] error and no controller is
/// built.
#[instrument(skip_all, fields(namespace = %settings.app.namespace))]
pub async fn start(
    settings: &PunchSettings,
    store: Arc<dyn DocumentStore>,
    identity: &dyn IdentityProvider,
    suggester: Arc<dyn SuggestTasks>,
    link: Option<&str>,
) -> Result<Controller, ControllerError> {
    let user = sign_in(settings, identity).await?;
    let repo = UnitRepository::new(store, &settings.app.namespace, user);
    let initial = link.and_then(|l| unit_from_link(l, &settings.link.param));
    info!(
        collection = repo.collection(),
        uid = %repo.identity().uid,
        initial = initial.as_ref().map(|id| id.as_str()),
        "controller ready"
    );
    Ok(Controller::new(
        Arc::new(repo),
        suggester,
        settings.link.clone(),
        initial,
    ))
}
