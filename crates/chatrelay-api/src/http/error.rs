//! Application error type mapping to HTTP status codes and the error envelope.
//!
//! Callers only ever see a fixed, non-leaking message per code; the
//! underlying cause is logged by the orchestrator or here.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatrelay_types::error::ChatError;
use chatrelay_types::llm::CompletionError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Failure of a chat exchange or history lookup.
    Chat(ChatError),
    /// Request body did not match the expected schema.
    Validation(String),
    /// Anything else; detail is logged, never returned.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::InvalidSession(_)) => (
                StatusCode::BAD_REQUEST,
                "INVALID_SESSION",
                "Session id is malformed".to_string(),
            ),
            AppError::Chat(ChatError::InvalidMessage(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::StorageUnavailable(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
                "Conversation storage is unavailable".to_string(),
            ),
            AppError::Chat(ChatError::Completion(CompletionError::Unavailable(_))) => (
                StatusCode::BAD_GATEWAY,
                "PROVIDER_UNAVAILABLE",
                "The completion provider is unavailable".to_string(),
            ),
            AppError::Chat(ChatError::Completion(CompletionError::Rejected { .. })) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PROVIDER_REJECTED",
                "The completion provider rejected the request".to_string(),
            ),
            AppError::Chat(ChatError::Completion(CompletionError::MalformedReply(_))) => (
                StatusCode::BAD_GATEWAY,
                "MALFORMED_REPLY",
                "The completion provider returned an unusable reply".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Internal error while handling request");
        }

        let (status, code, message) = self.parts();

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }],
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::error::{SessionError, StoreError};

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(AppError, StatusCode, &str)> = vec![
            (
                ChatError::from(SessionError::Malformed("x".into())).into(),
                StatusCode::BAD_REQUEST,
                "INVALID_SESSION",
            ),
            (
                ChatError::InvalidMessage("empty".into()).into(),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                ChatError::from(StoreError::Unavailable("down".into())).into(),
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
            ),
            (
                ChatError::from(CompletionError::Unavailable("reset".into())).into(),
                StatusCode::BAD_GATEWAY,
                "PROVIDER_UNAVAILABLE",
            ),
            (
                ChatError::from(CompletionError::Rejected {
                    status: 402,
                    message: "no credits".into(),
                })
                .into(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "PROVIDER_REJECTED",
            ),
            (
                ChatError::from(CompletionError::MalformedReply("no choices".into())).into(),
                StatusCode::BAD_GATEWAY,
                "MALFORMED_REPLY",
            ),
            (
                AppError::Internal("join error".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            let (actual_status, actual_code, _) = err.parts();
            assert_eq!(actual_status, status, "{code}");
            assert_eq!(actual_code, code);
        }
    }

    #[test]
    fn test_messages_do_not_leak_causes() {
        let err: AppError = ChatError::from(CompletionError::Rejected {
            status: 401,
            message: "key sk-or-secret revoked".into(),
        })
        .into();
        let (_, _, message) = err.parts();
        assert!(!message.contains("sk-or-secret"));

        let err: AppError = ChatError::from(StoreError::Unavailable("/var/db locked".into())).into();
        let (_, _, message) = err.parts();
        assert!(!message.contains("/var/db"));
    }
}
