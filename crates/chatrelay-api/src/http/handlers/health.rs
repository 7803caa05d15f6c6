//! GET /health - liveness of the relay and its conversation store.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use chatrelay_core::chat::repository::ConversationStore;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store = state.config.store.backend.to_string();
    let provider = state.orchestrator.client().name().to_string();

    match state.orchestrator.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "store": store,
                "provider": provider,
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed: store did not answer ping");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "version": env!("CARGO_PKG_VERSION"),
                    "store": store,
                    "provider": provider,
                })),
            )
        }
    }
}
