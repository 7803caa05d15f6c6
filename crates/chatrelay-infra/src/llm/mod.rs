//! Completion provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`CompletionClient`]
//! trait defined in `chatrelay-core`, plus a factory ([`create_client`])
//! that builds it from the `[provider]` configuration section.
//!
//! [`CompletionClient`]: chatrelay_core::llm::provider::CompletionClient

pub mod openai_compat;

use secrecy::SecretString;

use chatrelay_core::llm::box_provider::BoxCompletionClient;
use chatrelay_core::llm::provider::CompletionClient;
use chatrelay_types::config::ProviderConfig;
use chatrelay_types::llm::CompletionError;

use self::openai_compat::OpenAiCompatibleClient;
use self::openai_compat::config::OpenAiCompatConfig;

/// Read the provider API key from the environment variable named by
/// `provider.api_key_env`. Blank values count as missing.
pub fn api_key_from_env(config: &ProviderConfig) -> Option<SecretString> {
    std::env::var(&config.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}

/// Create a [`BoxCompletionClient`] from a [`ProviderConfig`] and a resolved key.
pub fn create_client(
    config: &ProviderConfig,
    api_key: SecretString,
) -> Result<BoxCompletionClient, CompletionError> {
    let client = OpenAiCompatibleClient::new(OpenAiCompatConfig::from_provider_config(config, api_key))?;
    tracing::debug!(
        provider = client.name(),
        model = client.model(),
        "Completion client ready"
    );
    Ok(BoxCompletionClient::new(client))
}
