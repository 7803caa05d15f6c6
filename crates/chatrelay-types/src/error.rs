use thiserror::Error;

use crate::llm::CompletionError;

/// Errors from validating a caller-supplied session token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("malformed session token: {0}")]
    Malformed(String),
}

/// Errors from constructing a turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("turn content must not be empty")]
    EmptyContent,
}

/// Errors from conversation store operations (used by trait definitions in chatrelay-core).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Failure of one chat exchange, as seen by the orchestrator's caller.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid session: {0}")]
    InvalidSession(#[from] SessionError),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl ChatError {
    /// Stable machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::InvalidSession(_) => "invalid_session",
            ChatError::InvalidMessage(_) => "invalid_message",
            ChatError::StorageUnavailable(_) => "storage_unavailable",
            ChatError::Completion(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable("pool timed out".to_string());
        assert_eq!(err.to_string(), "store unavailable: pool timed out");
    }

    #[test]
    fn test_chat_error_kinds() {
        let err: ChatError = SessionError::Malformed("x".into()).into();
        assert_eq!(err.kind(), "invalid_session");

        let err: ChatError = StoreError::Corrupt("bad role".into()).into();
        assert_eq!(err.kind(), "storage_unavailable");

        let err: ChatError = CompletionError::MalformedReply("empty".into()).into();
        assert_eq!(err.kind(), "malformed_reply");
        assert_eq!(err.to_string(), "malformed provider reply: empty");
    }
}
