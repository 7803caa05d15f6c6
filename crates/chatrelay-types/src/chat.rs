//! Session and turn types for chatrelay.
//!
//! A session is an opaque, caller-held key. Each session owns an append-only
//! log of turns; the log order is the literal prompt history sent to the
//! completion provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::{SessionError, TurnError};

/// Prefix carried by every session id.
pub const SESSION_PREFIX: &str = "session_";

/// Longest accepted body after the prefix.
const MAX_SESSION_BODY_LEN: usize = 64;

/// Opaque identifier of one conversation.
///
/// Well-formed ids are `session_` followed by 1-64 characters from
/// `[A-Za-z0-9_-]`. Minted ids use 32 lowercase hex digits from a v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Validate a caller-supplied token.
    pub fn parse(token: &str) -> Result<Self, SessionError> {
        let body = token
            .strip_prefix(SESSION_PREFIX)
            .ok_or_else(|| SessionError::Malformed("missing session prefix".to_string()))?;

        if body.is_empty() {
            return Err(SessionError::Malformed("empty session body".to_string()));
        }
        if body.len() > MAX_SESSION_BODY_LEN {
            return Err(SessionError::Malformed(format!(
                "session body longer than {MAX_SESSION_BODY_LEN} characters"
            )));
        }
        if !body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(SessionError::Malformed(
                "session body contains invalid characters".to_string(),
            ));
        }

        Ok(Self(token.to_string()))
    }

    /// Mint a fresh id with 122 bits of randomness.
    pub fn mint() -> Self {
        Self(format!("{SESSION_PREFIX}{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

/// A turn that has not been stored yet.
///
/// Content is guaranteed non-blank; the store assigns sequence and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTurn {
    role: Role,
    content: String,
}

impl NewTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self, TurnError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(TurnError::EmptyContent);
        }
        Ok(Self { role, content })
    }

    pub fn user(content: impl Into<String>) -> Result<Self, TurnError> {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Result<Self, TurnError> {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A stored, immutable turn.
///
/// `sequence` is 1-based and strictly increasing within a session; replay
/// order is by `sequence`, never by `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub session_id: SessionId,
    pub sequence: u64,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
