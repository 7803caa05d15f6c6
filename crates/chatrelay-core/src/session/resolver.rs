//! Session identity resolution.
//!
//! Pure: validates a caller-supplied token or mints a new id. Nothing is
//! written anywhere; a minted session only becomes durable when its first
//! exchange is persisted.

use chatrelay_types::chat::SessionId;
use chatrelay_types::error::SessionError;

/// Outcome of resolving a request's session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    pub id: SessionId,
    /// True when the id was minted for this request and must be echoed back.
    pub created: bool,
}

/// Stateless resolver; all logic is in associated functions.
pub struct SessionResolver;

impl SessionResolver {
    /// Resolve an optional token into a session id.
    ///
    /// - absent, empty, or whitespace-only: mint a new id
    /// - well-formed: returned unchanged
    /// - anything else: [`SessionError::Malformed`]
    pub fn resolve(token: Option<&str>) -> Result<ResolvedSession, SessionError> {
        match token {
            Some(token) if !token.trim().is_empty() => Ok(ResolvedSession {
                id: SessionId::parse(token)?,
                created: false,
            }),
            _ => Ok(ResolvedSession {
                id: SessionId::mint(),
                created: true,
            }),
        }
    }
}
