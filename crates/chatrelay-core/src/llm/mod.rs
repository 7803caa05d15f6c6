//! Completion provider abstractions for chatrelay.
//!
//! - `CompletionClient`: RPITIT trait for concrete provider implementations
//! - `BoxCompletionClient`: object-safe wrapper for dynamic dispatch
//! - `RetryPolicy`: orchestrator-owned retry rules for provider failures

pub mod box_provider;
pub mod provider;
pub mod retry;
