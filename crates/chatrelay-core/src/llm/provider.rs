//! CompletionClient trait definition.
//!
//! This is the core abstraction that completion providers implement.
//! Uses RPITIT for `complete` (Rust 2024 edition).

use chatrelay_types::llm::{Completion, CompletionError, Message};

/// Trait for completion provider backends.
///
/// One call to `complete` is exactly one provider request: no retries,
/// no fallback. Message order is preserved verbatim because providers are
/// order-sensitive.
///
/// Implementations live in chatrelay-infra (e.g., `OpenAiCompatibleClient`).
pub trait CompletionClient: Send + Sync {
    /// Human-readable provider name (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send the ordered history and return the generated reply.
    fn complete(
        &self,
        history: &[Message],
    ) -> impl std::future::Future<Output = Result<Completion, CompletionError>> + Send;
}
