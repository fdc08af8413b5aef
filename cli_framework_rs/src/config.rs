//! Framework configuration.
//!
//! `CliConfig` can be built in code or loaded from a TOML file such as
//! `clifw.toml`. Missing or malformed files fall back to defaults.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Settings for one [`Cli`](crate::Cli) instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Program name shown in help and version output
    pub name: String,

    pub version: String,

    pub description: Option<String>,

    /// Register the `help`/`h` and `version`/`v` commands
    pub builtin_commands: bool,

    /// Keep running remaining hooks (and the command) when a hook fails
    pub continue_on_hook_error: bool,

    /// Fallback filter for `logging::init_logging` when `CLIFW_LOG` is unset
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            name: "cli".to_string(),
            version: "0.0.0".to_string(),
            description: None,
            builtin_commands: true,
            continue_on_hook_error: true,
            log_level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load config from a TOML file.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse config; using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read config; using defaults");
                Self::default()
            }
        }
    }
}
