//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`PunchSettings::default()`]
//! 2. If `~/.punchlist/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. Validate
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::PunchSettings;

/// Resolve the path to the settings file (`~/.punchlist/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".punchlist").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<PunchSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults (plus overrides). If the file
/// contains invalid JSON, or the result fails validation, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<PunchSettings> {
    let mut settings = read_layered(path)?;
    apply_overrides(&mut settings, |name| std::env::var(name).ok());
    settings.validate()?;
    Ok(settings)
}

/// Defaults deep-merged with the file at `path`, without env overrides.
fn read_layered(path: &Path) -> Result<PunchSettings> {
    let defaults = serde_json::to_value(PunchSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `PUNCH_*` overrides read through `lookup`.
///
/// `lookup` is `std::env::var` in production; tests pass a map. Empty values
/// are ignored, as are booleans that fail [`parse_bool`] (with a warning).
pub fn apply_overrides(settings: &mut PunchSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());
    let read_bool = |name: &str| {
        let val = read(name)?;
        let parsed = parse_bool(&val);
        if parsed.is_none() {
            tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
        }
        parsed
    };

    // ── App / auth ──────────────────────────────────────────────────
    if let Some(v) = read("PUNCH_NAMESPACE") {
        settings.app.namespace = v;
    }
    if let Some(v) = read("PUNCH_AUTH_TOKEN") {
        settings.auth.token = Some(v);
    }

    // ── Suggestions ─────────────────────────────────────────────────
    if let Some(v) = read("PUNCH_GEMINI_API_KEY").or_else(|| read("GEMINI_API_KEY")) {
        settings.suggestions.api_key = Some(v);
    }
    if let Some(v) = read("PUNCH_GEMINI_MODEL") {
        settings.suggestions.model = v;
    }
    if let Some(v) = read("PUNCH_GEMINI_URL") {
        settings.suggestions.base_url = v.trim_end_matches('/').to_string();
    }
    if let Some(v) = read_bool("PUNCH_SUGGESTIONS_ENABLED") {
        settings.suggestions.enabled = v;
    }

    // ── Links / logging ─────────────────────────────────────────────
    if let Some(v) = read("PUNCH_LINK_BASE") {
        settings.link.base_url = v;
    }
    if let Some(v) = read("PUNCH_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read_bool("PUNCH_LOG_JSON") {
        settings.logging.json = v;
    }
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
