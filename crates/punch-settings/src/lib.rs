//! # punch-settings
//!
//! Configuration management with layered sources for the punch-list tracker.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`PunchSettings::default()`]
//! 2. **User file** — `~/.punchlist/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `PUNCH_*` overrides (highest priority)
//!
//! There is no global instance: the binary loads settings once and passes
//! the value to whatever needs it.
//!
//! # Usage
//!
//! ```no_run
//! use punch_settings::load_settings;
//!
//! let settings = load_settings().unwrap_or_default();
//! println!("namespace: {}", settings.app.namespace);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_overrides, deep_merge, load_settings, load_settings_from_path, settings_path,
};
pub use types::*;
