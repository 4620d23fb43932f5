//! Suggestion gateway errors.

use thiserror::Error;

/// Why a suggestion request produced no tasks.
#[derive(Debug, Error)]
pub enum SuggestionError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description from the response body.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The service returned an empty task list.
    #[error("no suggestions returned")]
    EmptySuggestions,

    /// No API key is configured.
    #[error("task suggestions are not configured")]
    NotConfigured,

    /// The configured API key cannot be sent as a header.
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),
}

impl SuggestionError {
    /// Short machine-readable failure class, used as a metric label.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Api { .. } => "api",
            Self::MalformedResponse(_) => "malformed",
            Self::EmptySuggestions => "empty",
            Self::NotConfigured => "not_configured",
            Self::InvalidApiKey(_) => "invalid_api_key",
        }
    }
}
