//! Configuration types for chatrelay.
//!
//! `RelayConfig` represents the top-level `config.toml`. Every field has a
//! default so an empty or missing file yields a runnable relay.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Top-level relay configuration.
///
/// Loaded from `~/.chatrelay/config.toml` (or `$CHATRELAY_DATA_DIR/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Listening address for the HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which conversation store backs the relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("invalid store backend: '{other}'")),
        }
    }
}

/// Conversation store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Explicit SQLite URL; defaults to `{data_dir}/chatrelay.db`.
    #[serde(default)]
    pub database_url: Option<String>,
}

/// Completion provider settings (OpenAI-compatible chat completions API).
///
/// The credential itself never lives in the file; `api_key_env` names the
/// environment variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Sent as `HTTP-Referer` (OpenRouter app attribution).
    #[serde(default)]
    pub referer: Option<String>,
    /// Sent as `X-Title` (OpenRouter app attribution).
    #[serde(default)]
    pub title: Option<String>,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "openai/gpt-3.5-turbo".to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_tokens: None,
            temperature: None,
            referer: None,
            title: None,
        }
    }
}

/// Orchestrator policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Longest accepted user message, in characters.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
    /// Extra attempts after a `ProviderUnavailable` failure.
    #[serde(default)]
    pub provider_retries: u32,
    /// Linear backoff unit between attempts.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_max_message_chars() -> usize {
    8_000
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
            provider_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}
