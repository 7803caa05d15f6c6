//! Completion request/response types for chatrelay.
//!
//! These types model the provider-facing view of a conversation: ordered
//! role/content pairs in, generated text out.

use serde::{Deserialize, Serialize};

use crate::chat::{NewTurn, Role, Turn};

/// A single message in the history handed to a completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

impl From<&NewTurn> for Message {
    fn from(turn: &NewTurn) -> Self {
        Self {
            role: turn.role(),
            content: turn.content().to_string(),
        }
    }
}

/// Reply extracted from a successful provider call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

/// Token usage reported by the provider (zero when not reported).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from one completion call.
///
/// The three kinds are kept apart so the orchestrator can decide retry and
/// HTTP status per kind.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Network failure, timeout, or a 5xx from the provider.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider refused the request (4xx: shape, quota, auth).
    #[error("provider rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// 2xx response with no extractable reply text.
    #[error("malformed provider reply: {0}")]
    MalformedReply(String),
}

impl CompletionError {
    /// Stable machine-readable kind, used in logs and error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Unavailable(_) => "provider_unavailable",
            CompletionError::Rejected { .. } => "provider_rejected",
            CompletionError::MalformedReply(_) => "malformed_reply",
        }
    }

    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CompletionError::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::SessionId;
    use chrono::Utc;

    #[test]
    fn test_message_from_turn_keeps_role_and_content() {
        let turn = Turn {
            session_id: SessionId::mint(),
            sequence: 3,
            role: Role::Assistant,
            content: "b".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(Message::from(&turn), Message::assistant("b"));

        let draft = NewTurn::user("c").unwrap();
        assert_eq!(Message::from(&draft), Message::user("c"));
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_string(&Message::user("hello")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);
    }

    #[test]
    fn test_only_unavailable_is_retryable() {
        assert!(CompletionError::Unavailable("timeout".into()).is_retryable());
        assert!(
            !CompletionError::Rejected {
                status: 401,
                message: "bad key".into()
            }
            .is_retryable()
        );
        assert!(!CompletionError::MalformedReply("no choices".into()).is_retryable());
    }

    #[test]
    fn test_completion_error_display() {
        let err = CompletionError::Rejected {
            status: 429,
            message: "quota".into(),
        };
        assert_eq!(err.to_string(), "provider rejected request (HTTP 429): quota");
        assert_eq!(err.kind(), "provider_rejected");
    }
}
