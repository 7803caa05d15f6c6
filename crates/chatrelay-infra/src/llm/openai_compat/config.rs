//! Configuration for OpenAI-compatible chat completion providers.

use std::time::Duration;

use chatrelay_types::config::ProviderConfig;
use secrecy::SecretString;

/// Settings for an [`super::OpenAiCompatibleClient`].
///
/// Intentionally not `Debug`: it carries the API key.
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openrouter").
    pub provider_name: String,
    /// Base URL for the API, without the `/chat/completions` suffix.
    pub base_url: String,
    pub api_key: SecretString,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    /// Optional `HTTP-Referer` attribution header.
    pub referer: Option<String>,
    /// Optional `X-Title` attribution header.
    pub title: Option<String>,
}

impl OpenAiCompatConfig {
    /// Build from the `[provider]` section of the relay configuration.
    pub fn from_provider_config(config: &ProviderConfig, api_key: SecretString) -> Self {
        Self {
            provider_name: provider_name_for(&config.base_url).to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            referer: config.referer.clone(),
            title: config.title.clone(),
        }
    }
}

/// OpenRouter defaults: `https://openrouter.ai/api/v1`, 60s timeout.
pub fn openrouter_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openrouter".into(),
        base_url: "https://openrouter.ai/api/v1".into(),
        api_key,
        model: model.into(),
        timeout: Duration::from_secs(60),
        max_tokens: None,
        temperature: None,
        referer: None,
        title: None,
    }
}

/// Name well-known hosts; anything else is a generic compatible endpoint.
fn provider_name_for(base_url: &str) -> &'static str {
    if base_url.contains("openrouter.ai") {
        "openrouter"
    } else if base_url.contains("api.openai.com") {
        "openai"
    } else {
        "openai-compatible"
    }
}
