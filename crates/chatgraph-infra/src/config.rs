//! Global configuration loader for chatgraph.
//!
//! Reads `config.toml` and deserializes it into [`GlobalConfig`]. Falls back
//! to defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use chatgraph_types::config::GlobalConfig;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolve the chatgraph home directory.
///
/// Priority:
/// 1. `CHATGRAPH_HOME` environment variable
/// 2. `~/.chatgraph`
pub fn resolve_home_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATGRAPH_HOME") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatgraph");
    }

    PathBuf::from(".chatgraph")
}

/// The config file to read: an explicit path if given, else
/// `{home}/config.toml`.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| resolve_home_dir().join(CONFIG_FILE_NAME))
}

/// Load global configuration from `path`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_global_config(path: &Path) -> GlobalConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => {
            tracing::debug!("Loaded configuration from {}", path.display());
            config
        }
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            GlobalConfig::default()
        }
    }
}
