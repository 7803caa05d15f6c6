//! ConversationStore trait definition.
//!
//! Append-only, per-session ordered persistence of turns. There are no
//! update or delete operations: history that was sent to the provider is
//! never rewritten.

use chatrelay_types::chat::{NewTurn, SessionId, Turn};
use chatrelay_types::error::StoreError;

/// Repository trait for conversation history.
///
/// Implementations live in chatrelay-infra (e.g., `SqliteConversationStore`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// Appends to the same session must be serialized by the implementation:
/// no lost writes, no duplicate sequence numbers. Appends to different
/// sessions are independent.
pub trait ConversationStore: Send + Sync {
    /// Append one turn at the end of the session's log.
    ///
    /// Returns the stored turn with its assigned sequence number.
    fn append(
        &self,
        session_id: &SessionId,
        turn: &NewTurn,
    ) -> impl std::future::Future<Output = Result<Turn, StoreError>> + Send;

    /// Load every turn of a session, ordered by sequence.
    ///
    /// An unknown session yields an empty vector, not an error.
    fn load(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, StoreError>> + Send;

    /// Append several turns as one block, in slice order.
    ///
    /// The default issues one `append` per turn, so a failure part-way
    /// leaves the earlier turns stored. Backends that can write the block
    /// atomically and contiguously should override this.
    fn append_exchange(
        &self,
        session_id: &SessionId,
        turns: &[NewTurn],
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, StoreError>> + Send {
        async move {
            let mut stored = Vec::with_capacity(turns.len());
            for turn in turns {
                stored.push(self.append(session_id, turn).await?);
            }
            Ok(stored)
        }
    }

    /// Cheap liveness probe for health checks.
    fn ping(&self) -> impl std::future::Future<Output = Result<(), StoreError>> + Send {
        async { Ok(()) }
    }
}
