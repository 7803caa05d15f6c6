//! Axum router configuration with middleware.
//!
//! Middleware: permissive CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(handlers::chat::post_chat))
        .route(
            "/api/chat/{session_id}/history",
            get(handlers::chat::get_history),
        )
        .route("/health", get(handlers::health::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use chatrelay_core::chat::box_store::BoxConversationStore;
    use chatrelay_core::chat::repository::ConversationStore;
    use chatrelay_core::chat::service::ChatOrchestrator;
    use chatrelay_core::llm::box_provider::BoxCompletionClient;
    use chatrelay_core::llm::provider::CompletionClient;
    use chatrelay_infra::memory::InMemoryConversationStore;
    use chatrelay_types::chat::{NewTurn, SessionId, Turn};
    use chatrelay_types::config::{RelayConfig, StoreBackend};
    use chatrelay_types::error::StoreError;
    use chatrelay_types::llm::{Completion, CompletionError, Message, Usage};

    /// In-memory store with switchable failures.
    #[derive(Clone, Default)]
    struct FlakyStore {
        inner: Arc<InMemoryConversationStore>,
        fail_load: Arc<AtomicBool>,
        fail_append: Arc<AtomicBool>,
    }

    impl ConversationStore for FlakyStore {
        async fn append(&self, session_id: &SessionId, turn: &NewTurn) -> Result<Turn, StoreError> {
            if self.fail_append.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("disk full".into()));
            }
            self.inner.append(session_id, turn).await
        }

        async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError> {
            if self.fail_load.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("connection refused".into()));
            }
            self.inner.load(session_id).await
        }

        async fn append_exchange(
            &self,
            session_id: &SessionId,
            turns: &[NewTurn],
        ) -> Result<Vec<Turn>, StoreError> {
            if self.fail_append.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("disk full".into()));
            }
            self.inner.append_exchange(session_id, turns).await
        }

        async fn ping(&self) -> Result<(), StoreError> {
            if self.fail_load.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("connection refused".into()));
            }
            Ok(())
        }
    }

    type Script = Arc<Mutex<VecDeque<Result<String, CompletionError>>>>;

    /// Replays scripted results, then answers "hi there".
    #[derive(Clone, Default)]
    struct StubClient {
        script: Script,
        seen: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    impl CompletionClient for StubClient {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, history: &[Message]) -> Result<Completion, CompletionError> {
            self.seen.lock().unwrap().push(history.to_vec());
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok("hi there".to_string()))
                .map(|content| Completion {
                    content,
                    model: "stub-1".to_string(),
                    usage: Usage::default(),
                })
        }
    }

    struct Harness {
        router: Router,
        store: FlakyStore,
        client: StubClient,
    }

    fn harness() -> Harness {
        let store = FlakyStore::default();
        let client = StubClient::default();
        let orchestrator = ChatOrchestrator::new(
            BoxConversationStore::new(store.clone()),
            BoxCompletionClient::new(client.clone()),
        )
        .with_max_message_chars(100);

        let mut config = RelayConfig::default();
        config.store.backend = StoreBackend::Memory;
        let state = AppState::new(orchestrator, config, PathBuf::from("/tmp/chatrelay-test"));

        Harness {
            router: build_router(state),
            store,
            client,
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_chat(body: Value) -> Request<Body> {
        Request::post("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn error_code(body: &Value) -> &str {
        body["errors"][0]["code"].as_str().unwrap()
    }

    #[tokio::test]
    async fn test_first_message_returns_reply_and_new_session() {
        let h = harness();

        let (status, body) = send(&h.router, post_chat(json!({"message": "hello"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "hi there");
        let session_id = body["sessionId"].as_str().unwrap();
        assert!(session_id.starts_with("session_"));

        let (status, history) = send(&h.router, get(&format!("/api/chat/{session_id}/history"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["sessionId"], session_id);
        let turns = history["turns"].as_array().unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[0]["content"], "hello");
        assert_eq!(turns[0]["sequence"], 1);
        assert_eq!(turns[1]["role"], "assistant");
        assert_eq!(turns[1]["content"], "hi there");
        assert!(turns[1]["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_follow_up_sends_full_history() {
        let h = harness();

        let (_, first) = send(&h.router, post_chat(json!({"message": "a"}))).await;
        let session_id = first["sessionId"].as_str().unwrap().to_string();

        let (status, second) = send(
            &h.router,
            post_chat(json!({"message": "c", "sessionId": session_id})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["sessionId"], session_id.as_str());
        let seen = h.client.seen.lock().unwrap().clone();
        assert_eq!(
            seen[1],
            vec![
                Message::user("a"),
                Message::assistant("hi there"),
                Message::user("c")
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_session_is_rejected() {
        let h = harness();

        let (status, body) = send(
            &h.router,
            post_chat(json!({"message": "hello", "sessionId": "guest-1"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "INVALID_SESSION");
        assert!(body["meta"]["timestamp"].is_string());
        assert!(h.client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_validation_errors() {
        let h = harness();

        for body in [
            json!({"message": "   "}),
            json!({"message": "x".repeat(101)}),
            json!({"sessionId": "session_abc"}),
            json!({"message": 42}),
        ] {
            let (status, response) = send(&h.router, post_chat(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(error_code(&response), "VALIDATION_ERROR");
        }

        let request = Request::post("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, response) = send(&h.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&response), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_provider_failures_map_to_gateway_statuses() {
        let cases = [
            (
                CompletionError::Unavailable("connection reset".into()),
                StatusCode::BAD_GATEWAY,
                "PROVIDER_UNAVAILABLE",
            ),
            (
                CompletionError::Rejected {
                    status: 401,
                    message: "invalid key".into(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
                "PROVIDER_REJECTED",
            ),
            (
                CompletionError::MalformedReply("no choices".into()),
                StatusCode::BAD_GATEWAY,
                "MALFORMED_REPLY",
            ),
        ];

        for (error, expected_status, expected_code) in cases {
            let h = harness();
            h.client.script.lock().unwrap().push_back(Err(error));

            let (status, body) = send(
                &h.router,
                post_chat(json!({"message": "hello", "sessionId": "session_fail"})),
            )
            .await;

            assert_eq!(status, expected_status);
            assert_eq!(error_code(&body), expected_code);

            let (_, history) = send(&h.router, get("/api/chat/session_fail/history")).await;
            assert!(history["turns"].as_array().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_append_failure_still_returns_reply() {
        let h = harness();
        h.store.fail_append.store(true, Ordering::SeqCst);

        let (status, body) = send(&h.router, post_chat(json!({"message": "hello"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "hi there");
    }

    #[tokio::test]
    async fn test_load_failure_is_service_unavailable() {
        let h = harness();
        h.store.fail_load.store(true, Ordering::SeqCst);

        let (status, body) = send(&h.router, post_chat(json!({"message": "hello"}))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error_code(&body), "STORAGE_UNAVAILABLE");
        assert!(h.client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_of_unknown_session_is_empty() {
        let h = harness();
        let (status, body) = send(&h.router, get("/api/chat/session_nobody/history")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["turns"].as_array().unwrap().is_empty());

        let (status, body) = send(&h.router, get("/api/chat/bogus/history")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "INVALID_SESSION");
    }

    #[tokio::test]
    async fn test_history_load_failure_is_service_unavailable() {
        let h = harness();
        h.store.fail_load.store(true, Ordering::SeqCst);

        let (status, body) = send(&h.router, get("/api/chat/session_known/history")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error_code(&body), "STORAGE_UNAVAILABLE");
        assert!(!body.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_health_reflects_store() {
        let h = harness();

        let (status, body) = send(&h.router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
        assert_eq!(body["provider"], "stub");

        h.store.fail_load.store(true, Ordering::SeqCst);
        let (status, body) = send(&h.router, get("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let h = harness();
        let request = Request::get("/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();

        let response = h.router.clone().oneshot(request).await.unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }
}
