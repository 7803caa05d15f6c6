//! Per-request state machine for one chat exchange.
//!
//! Idle -> ResolvingSession -> LoadingHistory -> AwaitingCompletion -> Persisting -> Done
//! Any non-terminal state may move to Failed. Done and Failed are terminal.

use std::fmt;

use chatrelay_types::chat::SessionId;
use tracing::{debug, warn};

/// Exchange states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    ResolvingSession,
    LoadingHistory,
    AwaitingCompletion,
    Persisting,
    Done,
    Failed,
}

impl ExchangeState {
    /// Valid next states from the current state.
    pub fn valid_transitions(&self) -> &'static [ExchangeState] {
        match self {
            Self::Idle => &[Self::ResolvingSession, Self::Failed],
            Self::ResolvingSession => &[Self::LoadingHistory, Self::Failed],
            Self::LoadingHistory => &[Self::AwaitingCompletion, Self::Failed],
            Self::AwaitingCompletion => &[Self::Persisting, Self::Failed],
            Self::Persisting => &[Self::Done, Self::Failed],
            Self::Done | Self::Failed => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn can_transition_to(&self, next: ExchangeState) -> bool {
        self.valid_transitions().contains(&next)
    }
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::ResolvingSession => write!(f, "resolving_session"),
            Self::LoadingHistory => write!(f, "loading_history"),
            Self::AwaitingCompletion => write!(f, "awaiting_completion"),
            Self::Persisting => write!(f, "persisting"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Tracks the state of one in-flight exchange.
#[derive(Debug)]
pub struct Exchange {
    state: ExchangeState,
    session_id: Option<SessionId>,
}

impl Exchange {
    pub fn new() -> Self {
        Self {
            state: ExchangeState::Idle,
            session_id: None,
        }
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn bind_session(&mut self, session_id: SessionId) {
        self.session_id = Some(session_id);
    }

    /// Move to `next` if the transition is valid; invalid transitions are
    /// logged and ignored, so a terminal state is never left.
    pub fn advance(&mut self, next: ExchangeState) -> bool {
        let session_id = self.session_id.as_ref().map(SessionId::as_str).unwrap_or("-");

        if !self.state.can_transition_to(next) {
            warn!(session_id, from = %self.state, to = %next, "Ignored invalid exchange transition");
            return false;
        }

        debug!(session_id, from = %self.state, to = %next, "Exchange transition");
        self.state = next;
        true
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}
