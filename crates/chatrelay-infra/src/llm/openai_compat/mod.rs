//! OpenAiCompatibleClient -- concrete [`CompletionClient`] for any provider
//! speaking the OpenAI chat completions protocol (OpenRouter by default).
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `Authorization` header.

pub mod config;
pub mod types;

use secrecy::ExposeSecret;

use chatrelay_core::llm::provider::CompletionClient;
use chatrelay_types::llm::{Completion, CompletionError, Message, Usage};

use self::config::OpenAiCompatConfig;
use self::types::{ChatCompletionRequest, ChatCompletionResponse, ErrorEnvelope};

/// Longest provider error body carried into an error message.
const MAX_ERROR_SNIPPET: usize = 300;

/// Chat completions client.
///
/// One `complete` call is one HTTP request. Status handling:
/// transport failures, timeouts and 5xx are `Unavailable`; 4xx is
/// `Rejected`; a 2xx without usable text is `MalformedReply`.
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    config: OpenAiCompatConfig,
}

// No Debug derive: `config` holds the API key.

impl OpenAiCompatibleClient {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompletionError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// The model requested on every call.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

impl CompletionClient for OpenAiCompatibleClient {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    async fn complete(&self, history: &[Message]) -> Result<Completion, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: history,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let mut request = self
            .client
            .post(self.url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body);
        if let Some(referer) = &self.config.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.title {
            request = request.header("X-Title", title);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CompletionError::Unavailable(format!(
                    "request timed out after {}s",
                    self.config.timeout.as_secs_f64()
                ))
            } else {
                CompletionError::Unavailable(format!("HTTP request failed: {e}"))
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::Unavailable(format!("failed to read response body: {e}")))?;

        if status.is_client_error() {
            return Err(CompletionError::Rejected {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        if !status.is_success() {
            return Err(CompletionError::Unavailable(format!(
                "HTTP {status}: {}",
                error_message(&text)
            )));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| CompletionError::MalformedReply(format!("undecodable body: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::MalformedReply("response has no choices".to_string()))?
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| CompletionError::MalformedReply("first choice has no text".to_string()))?;

        let usage = parsed
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(Completion {
            content,
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
            usage,
        })
    }
}

/// Prefer the provider's `error.message`; fall back to a bounded body snippet.
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_SNIPPET).collect()
}
