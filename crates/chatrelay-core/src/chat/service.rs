//! Chat orchestrator driving one request/response exchange.
//!
//! ChatOrchestrator coordinates the SessionResolver, the ConversationStore,
//! and the CompletionClient: resolve the session, load its history, ask the
//! provider for a reply, then persist the user and assistant turns together.

use chatrelay_types::chat::{NewTurn, SessionId, Turn};
use chatrelay_types::error::ChatError;
use chatrelay_types::llm::{Completion, CompletionError, Message};
use tracing::{error, info, warn};

use crate::chat::exchange::{Exchange, ExchangeState};
use crate::chat::repository::ConversationStore;
use crate::llm::provider::CompletionClient;
use crate::llm::retry::RetryPolicy;
use crate::session::resolver::SessionResolver;

/// Default upper bound on an inbound message, in characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 8_000;

/// One inbound chat message.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    /// Caller-held session token; `None` starts a new conversation.
    pub session_token: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_token: Option<String>) -> Self {
        Self {
            message: message.into(),
            session_token,
        }
    }
}

/// Result of a completed exchange.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    pub session_id: SessionId,
    /// True when the session id was minted for this request.
    pub session_created: bool,
    /// False when the reply was produced but the turns could not be stored.
    pub persisted: bool,
    pub model: String,
}

/// Orchestrates a single chat exchange.
///
/// Generic over `ConversationStore` and `CompletionClient` so that
/// chatrelay-core never depends on chatrelay-infra. Holds no per-session
/// state: every request re-reads history from the store.
pub struct ChatOrchestrator<S: ConversationStore, P: CompletionClient> {
    store: S,
    client: P,
    retry: RetryPolicy,
    max_message_chars: usize,
}

impl<S: ConversationStore, P: CompletionClient> ChatOrchestrator<S, P> {
    pub fn new(store: S, client: P) -> Self {
        Self {
            store,
            client,
            retry: RetryPolicy::none(),
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_message_chars(mut self, max_message_chars: usize) -> Self {
        self.max_message_chars = max_message_chars;
        self
    }

    /// Access the conversation store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access the completion client.
    pub fn client(&self) -> &P {
        &self.client
    }

    /// Run one exchange to a terminal state.
    ///
    /// Failures before a reply exists leave the store untouched. A failure
    /// to persist after a reply exists is logged and reported through
    /// [`ChatOutcome::persisted`] instead of failing the exchange.
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatOutcome, ChatError> {
        let mut exchange = Exchange::new();

        match self.run(&mut exchange, request).await {
            Ok(outcome) => {
                exchange.advance(ExchangeState::Done);
                Ok(outcome)
            }
            Err(e) => {
                exchange.advance(ExchangeState::Failed);
                let session_id = exchange.session_id().map(SessionId::as_str).unwrap_or("-");
                match &e {
                    ChatError::InvalidSession(_) | ChatError::InvalidMessage(_) => {
                        warn!(session_id, kind = e.kind(), error = %e, "Chat request rejected");
                    }
                    _ => {
                        error!(session_id, kind = e.kind(), error = %e, "Chat exchange failed");
                    }
                }
                Err(e)
            }
        }
    }

    /// Load a session's stored turns for display.
    ///
    /// Unlike `handle`, the token is mandatory: there is nothing to show
    /// for a session that does not exist yet.
    pub async fn history(&self, session_token: &str) -> Result<Vec<Turn>, ChatError> {
        let session_id = SessionId::parse(session_token).inspect_err(|e| {
            warn!(kind = "invalid_session", error = %e, "History request rejected");
        })?;

        match self.store.load(&session_id).await {
            Ok(turns) => Ok(turns),
            Err(e) => {
                let e = ChatError::from(e);
                error!(
                    session_id = %session_id,
                    kind = e.kind(),
                    error = %e,
                    "Failed to load history"
                );
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        exchange: &mut Exchange,
        request: ChatRequest,
    ) -> Result<ChatOutcome, ChatError> {
        exchange.advance(ExchangeState::ResolvingSession);
        let resolved = SessionResolver::resolve(request.session_token.as_deref())?;
        exchange.bind_session(resolved.id.clone());
        let user_turn = self.validate_message(request.message)?;

        exchange.advance(ExchangeState::LoadingHistory);
        let history = self.store.load(&resolved.id).await?;
        let mut outbound: Vec<Message> = history.iter().map(Message::from).collect();
        outbound.push(Message::from(&user_turn));

        exchange.advance(ExchangeState::AwaitingCompletion);
        let completion = self.complete_with_retry(&resolved.id, &outbound).await?;
        let assistant_turn = NewTurn::assistant(completion.content.clone())
            .map_err(|_| CompletionError::MalformedReply("reply text is blank".to_string()))?;

        exchange.advance(ExchangeState::Persisting);
        let persisted = self
            .persist(&resolved.id, user_turn, assistant_turn)
            .await;

        Ok(ChatOutcome {
            reply: completion.content,
            session_id: resolved.id,
            session_created: resolved.created,
            persisted,
            model: completion.model,
        })
    }

    fn validate_message(&self, message: String) -> Result<NewTurn, ChatError> {
        let chars = message.chars().count();
        if chars > self.max_message_chars {
            return Err(ChatError::InvalidMessage(format!(
                "message is {chars} characters, limit is {}",
                self.max_message_chars
            )));
        }
        NewTurn::user(message).map_err(|e| ChatError::InvalidMessage(e.to_string()))
    }

    async fn complete_with_retry(
        &self,
        session_id: &SessionId,
        history: &[Message],
    ) -> Result<Completion, CompletionError> {
        let mut attempt = 1;
        loop {
            match self.client.complete(history).await {
                Ok(completion) => {
                    info!(
                        session_id = %session_id,
                        provider = self.client.name(),
                        model = %completion.model,
                        attempt,
                        turns = history.len(),
                        input_tokens = completion.usage.input_tokens,
                        output_tokens = completion.usage.output_tokens,
                        "Completion received"
                    );
                    return Ok(completion);
                }
                Err(e) if self.retry.should_retry(&e, attempt) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        session_id = %session_id,
                        provider = self.client.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Completion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn persist(
        &self,
        session_id: &SessionId,
        user_turn: NewTurn,
        assistant_turn: NewTurn,
    ) -> bool {
        match self
            .store
            .append_exchange(session_id, &[user_turn, assistant_turn])
            .await
        {
            Ok(stored) => {
                info!(session_id = %session_id, turns = stored.len(), "Exchange persisted");
                true
            }
            Err(e) => {
                error!(
                    session_id = %session_id,
                    kind = "storage_unavailable",
                    error = %e,
                    "Failed to persist exchange, reply returned unsaved"
                );
                false
            }
        }
    }
}
