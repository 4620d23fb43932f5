//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` for the JSON file
//! format. Each type implements [`Default`] with production default values and
//! is marked `#[serde(default)]`, so a partial file only overrides what it
//! names.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// # JSON Format
///
/// ```json
/// {
///   "app": { "namespace": "riverside-phase-2" },
///   "suggestions": { "model": "gemini-2.0-flash" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PunchSettings {
    /// Settings schema version.
    pub version: String,
    /// Deployment/application scoping for stored data.
    pub app: AppSettings,
    /// Sign-in configuration.
    pub auth: AuthSettings,
    /// Task suggestion gateway configuration.
    pub suggestions: SuggestionSettings,
    /// Shareable link format.
    pub link: LinkSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for PunchSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            app: AppSettings::default(),
            auth: AuthSettings::default(),
            suggestions: SuggestionSettings::default(),
            link: LinkSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl PunchSettings {
    /// Reject values that would address the wrong data.
    ///
    /// The namespace becomes the first path segment of the unit collection,
    /// so it must be non-blank and contain no `/`.
    pub fn validate(&self) -> Result<()> {
        let ns = &self.app.namespace;
        if ns.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "app.namespace must not be empty".to_string(),
            ));
        }
        if ns.contains('/') {
            return Err(SettingsError::InvalidValue(format!(
                "app.namespace must not contain '/': {ns}"
            )));
        }
        if self.link.param.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "link.param must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Application scoping.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Namespace prefix for collections: units live at `<namespace>/units`.
    pub namespace: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            namespace: "default-app-id".to_string(),
        }
    }
}

/// Sign-in configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthSettings {
    /// Custom sign-in token. Anonymous sign-in is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Gemini `generateContent` settings for task suggestions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestionSettings {
    /// Whether the suggestion gateway is wired at all.
    pub enabled: bool,
    /// API base URL (no trailing slash).
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// API key. Suggestions are unavailable without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
        }
    }
}

impl SuggestionSettings {
    /// The API key, if suggestions are enabled and a non-blank key is set.
    #[must_use]
    pub fn usable_api_key(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Shareable link format.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkSettings {
    /// Base URL links are built on.
    pub base_url: String,
    /// Query parameter carrying the unit identifier.
    pub param: String,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            base_url: "https://punchlist.local/app".to_string(),
            param: "unit".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}
