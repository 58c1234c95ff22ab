mod loader;
pub use loader::{load_user_config, load_user_config_from};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("Failed to read user config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse user config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
fn default_rotation() -> String {
    "daily".to_string()
}
/// Logging defaults (`[logging]` table in the TOML file).
///
/// Command-line flags and `CENTY_LOG_*` variables take precedence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
    #[serde(default = "default_rotation")]
    pub rotation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            rotation: default_rotation(),
            dir: None,
        }
    }
}
/// Top-level user configuration, deserialized from `~/.centy/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}
/// Resolve the canonical path for the user config file.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".centy").join("config.toml"))
}
#[cfg(test)]
#[path = "../user_config_tests.rs"]
mod user_config_tests;
