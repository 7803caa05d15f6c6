//! In-memory conversation store.
//!
//! Each session's log sits behind its own async mutex, so appends to one
//! session are serialized while other sessions proceed independently.
//! Nothing survives a restart; used for tests and `--store memory` runs.

use std::sync::Arc;

use chatrelay_core::chat::repository::ConversationStore;
use chatrelay_types::chat::{NewTurn, SessionId, Turn};
use chatrelay_types::error::StoreError;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

type SessionLog = Arc<Mutex<Vec<Turn>>>;

/// Process-local implementation of `ConversationStore`.
#[derive(Default)]
pub struct InMemoryConversationStore {
    sessions: DashMap<SessionId, SessionLog>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions with at least one stored turn.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The session's log, created on first write.
    ///
    /// The map guard is released before the caller awaits the log's mutex.
    fn log_for(&self, session_id: &SessionId) -> SessionLog {
        self.sessions
            .entry(session_id.clone())
            .or_default()
            .value()
            .clone()
    }

    fn push(log: &mut Vec<Turn>, session_id: &SessionId, turn: &NewTurn) -> Turn {
        let stored = Turn {
            session_id: session_id.clone(),
            sequence: log.len() as u64 + 1,
            role: turn.role(),
            content: turn.content().to_string(),
            created_at: Utc::now(),
        };
        log.push(stored.clone());
        stored
    }
}

impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, session_id: &SessionId, turn: &NewTurn) -> Result<Turn, StoreError> {
        let log = self.log_for(session_id);
        let mut log = log.lock().await;
        Ok(Self::push(&mut log, session_id, turn))
    }

    async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError> {
        let log = match self.sessions.get(session_id) {
            Some(entry) => entry.value().clone(),
            None => return Ok(Vec::new()),
        };
        let log = log.lock().await;
        Ok(log.clone())
    }

    async fn append_exchange(
        &self,
        session_id: &SessionId,
        turns: &[NewTurn],
    ) -> Result<Vec<Turn>, StoreError> {
        let log = self.log_for(session_id);
        let mut log = log.lock().await;
        Ok(turns
            .iter()
            .map(|turn| Self::push(&mut log, session_id, turn))
            .collect())
    }
}
