//! Retry policy for completion calls.
//!
//! The completion client makes exactly one request per call; whether a
//! failed call is repeated is decided here, by the orchestrator.

use std::time::Duration;

use chatrelay_types::config::ChatConfig;
use chatrelay_types::llm::CompletionError;

/// Stateless retry rules: how many extra attempts, and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Single attempt, never retry.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(
            config.provider_retries,
            Duration::from_millis(config.retry_backoff_ms),
        )
    }

    /// Whether to try again after `attempt` (1-based) failed with `error`.
    pub fn should_retry(&self, error: &CompletionError, attempt: u32) -> bool {
        error.is_retryable() && attempt <= self.max_retries
    }

    /// Linear backoff: the n-th retry waits `n * backoff`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
