//! BoxCompletionClient -- object-safe dynamic dispatch wrapper for CompletionClient.
//!
//! 1. Define an object-safe `CompletionClientDyn` trait with boxed futures
//! 2. Blanket-impl `CompletionClientDyn` for all `T: CompletionClient`
//! 3. `BoxCompletionClient` wraps `Box<dyn CompletionClientDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use chatrelay_types::llm::{Completion, CompletionError, Message};

use super::provider::CompletionClient;

/// Object-safe version of [`CompletionClient`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn CompletionClientDyn`).
/// A blanket implementation is provided for all types implementing `CompletionClient`.
pub trait CompletionClientDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        history: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<Completion, CompletionError>> + Send + 'a>>;
}

/// Blanket implementation: any `CompletionClient` automatically implements `CompletionClientDyn`.
impl<T: CompletionClient> CompletionClientDyn for T {
    fn name(&self) -> &str {
        CompletionClient::name(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        history: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<Completion, CompletionError>> + Send + 'a>> {
        Box::pin(self.complete(history))
    }
}

/// Type-erased completion client.
///
/// Since `CompletionClient` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxCompletionClient` provides equivalent inherent methods and
/// also implements `CompletionClient`, so it slots into generic code.
pub struct BoxCompletionClient {
    inner: Box<dyn CompletionClientDyn>,
}

impl BoxCompletionClient {
    /// Wrap a concrete `CompletionClient` in a type-erased box.
    pub fn new<T: CompletionClient + 'static>(client: T) -> Self {
        Self {
            inner: Box::new(client),
        }
    }

    /// Human-readable provider name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send the ordered history and return the generated reply.
    pub async fn complete(&self, history: &[Message]) -> Result<Completion, CompletionError> {
        self.inner.complete_boxed(history).await
    }
}

impl CompletionClient for BoxCompletionClient {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn complete(
        &self,
        history: &[Message],
    ) -> impl Future<Output = Result<Completion, CompletionError>> + Send {
        async move { self.inner.complete_boxed(history).await }
    }
}
