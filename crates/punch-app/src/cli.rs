//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;
use punch_settings::PunchSettings;

/// Punch-list tracker for construction units.
#[derive(Parser, Debug)]
#[command(name = "punch", about = "Punch-list tracker for construction units")]
pub struct Cli {
    /// Settings file (defaults to `~/.punchlist/settings.json`).
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Shareable link to open a unit directly.
    #[arg(long)]
    pub link: Option<String>,

    /// Sign-in token (anonymous sign-in when absent).
    #[arg(long)]
    pub token: Option<String>,

    /// Application namespace the units collection lives under.
    #[arg(long)]
    pub namespace: Option<String>,

    /// Log level filter (`RUST_LOG` takes precedence).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, default_value_t = false)]
    pub json_logs: bool,
}

impl Cli {
    /// Apply flags over loaded settings. Flags win over file and env.
    pub fn apply(&self, settings: &mut PunchSettings) {
        if let Some(ref token) = self.token {
            settings.auth.token = Some(token.clone());
        }
        if let Some(ref namespace) = self.namespace {
            settings.app.namespace.clone_from(namespace);
        }
        if let Some(ref level) = self.log_level {
            settings.logging.level.clone_from(level);
        }
        if self.json_logs {
            settings.logging.json = true;
        }
    }
}
