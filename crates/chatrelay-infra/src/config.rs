//! Relay configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.chatrelay/` by default)
//! and deserializes it into [`RelayConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use chatrelay_types::config::RelayConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CHATRELAY_DATA_DIR";

/// Resolve the data directory.
///
/// Priority:
/// 1. `CHATRELAY_DATA_DIR` environment variable
/// 2. `~/.chatrelay`
/// 3. `./.chatrelay` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatrelay");
    }

    PathBuf::from(".chatrelay")
}

/// Load relay configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`RelayConfig::default()`].
/// - Unreadable or unparsable file: warning, then the default.
pub async fn load_config(data_dir: &Path) -> RelayConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RelayConfig::default()
        }
    }
}
