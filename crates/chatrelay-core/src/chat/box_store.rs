//! BoxConversationStore -- object-safe dynamic dispatch wrapper for ConversationStore.
//!
//! Same blanket-impl pattern as `BoxCompletionClient`:
//! 1. Define an object-safe `ConversationStoreDyn` trait with boxed futures
//! 2. Blanket-impl `ConversationStoreDyn` for all `T: ConversationStore`
//! 3. `BoxConversationStore` wraps `Box<dyn ConversationStoreDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use chatrelay_types::chat::{NewTurn, SessionId, Turn};
use chatrelay_types::error::StoreError;

use super::repository::ConversationStore;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`ConversationStore`] with boxed futures.
pub trait ConversationStoreDyn: Send + Sync {
    fn append_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        turn: &'a NewTurn,
    ) -> BoxFuture<'a, Result<Turn, StoreError>>;

    fn load_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<Turn>, StoreError>>;

    fn append_exchange_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        turns: &'a [NewTurn],
    ) -> BoxFuture<'a, Result<Vec<Turn>, StoreError>>;

    fn ping_boxed(&self) -> BoxFuture<'_, Result<(), StoreError>>;
}

impl<T: ConversationStore> ConversationStoreDyn for T {
    fn append_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        turn: &'a NewTurn,
    ) -> BoxFuture<'a, Result<Turn, StoreError>> {
        Box::pin(self.append(session_id, turn))
    }

    fn load_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<Turn>, StoreError>> {
        Box::pin(self.load(session_id))
    }

    fn append_exchange_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        turns: &'a [NewTurn],
    ) -> BoxFuture<'a, Result<Vec<Turn>, StoreError>> {
        Box::pin(self.append_exchange(session_id, turns))
    }

    fn ping_boxed(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(self.ping())
    }
}

/// Type-erased conversation store for runtime backend selection.
///
/// Lets the binary pick SQLite or in-memory storage from configuration
/// while the orchestrator stays generic.
pub struct BoxConversationStore {
    inner: Box<dyn ConversationStoreDyn>,
}

impl BoxConversationStore {
    /// Wrap a concrete `ConversationStore` in a type-erased box.
    pub fn new<T: ConversationStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }
}

impl ConversationStore for BoxConversationStore {
    fn append(
        &self,
        session_id: &SessionId,
        turn: &NewTurn,
    ) -> impl Future<Output = Result<Turn, StoreError>> + Send {
        async move { self.inner.append_boxed(session_id, turn).await }
    }

    fn load(
        &self,
        session_id: &SessionId,
    ) -> impl Future<Output = Result<Vec<Turn>, StoreError>> + Send {
        async move { self.inner.load_boxed(session_id).await }
    }

    fn append_exchange(
        &self,
        session_id: &SessionId,
        turns: &[NewTurn],
    ) -> impl Future<Output = Result<Vec<Turn>, StoreError>> + Send {
        async move { self.inner.append_exchange_boxed(session_id, turns).await }
    }

    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        self.inner.ping_boxed()
    }
}
