//! Chat endpoints.
//!
//! POST /api/chat                        - One exchange: message in, reply out.
//! GET  /api/chat/{session_id}/history   - Stored turns of a session.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatrelay_core::chat::service::ChatRequest;
use chatrelay_types::chat::{Role, Turn};

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for `POST /api/chat`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for `POST /api/chat`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReply {
    pub session_id: String,
    pub turns: Vec<TurnView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnView {
    pub sequence: u64,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Turn> for TurnView {
    fn from(turn: Turn) -> Self {
        Self {
            sequence: turn.sequence,
            role: turn.role,
            content: turn.content,
            created_at: turn.created_at,
        }
    }
}

/// POST /api/chat
///
/// The exchange runs on its own task: if the caller disconnects mid-flight
/// the exchange still finishes and persists.
pub async fn post_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(body) = payload?;

    let orchestrator = Arc::clone(&state.orchestrator);
    let request = ChatRequest::new(body.message, body.session_id);
    let outcome = tokio::spawn(async move { orchestrator.handle(request).await })
        .await
        .map_err(|e| AppError::Internal(format!("chat task failed: {e}")))??;

    Ok(Json(ChatReply {
        response: outcome.reply,
        session_id: outcome.session_id.to_string(),
    }))
}

/// GET /api/chat/{session_id}/history
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryReply>, AppError> {
    let turns = state.orchestrator.history(&session_id).await?;

    Ok(Json(HistoryReply {
        session_id,
        turns: turns.into_iter().map(TurnView::from).collect(),
    }))
}
