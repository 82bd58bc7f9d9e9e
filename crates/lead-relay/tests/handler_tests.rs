// ═══════════════════════════════════════════════════════════════════
// Router Tests: /api/submit-lead status codes and bodies, /healthz
// ═══════════════════════════════════════════════════════════════════

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use lead_relay::error::RelayError;
use lead_relay::sender::MessageSender;
use lead_relay::server::{build_router, RelayState, SUBMIT_PATH};

// ═══════════════════════════════════════════════════════════════════
// Mock Sender
// ═══════════════════════════════════════════════════════════════════

#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingSender {
    fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, text: &str) -> Result<(), RelayError> {
        self.sent.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(RelayError::Downstream("Failed to send to Telegram".into()));
        }
        Ok(())
    }
}

fn router_with(sender: &Arc<RecordingSender>) -> Router {
    build_router(RelayState::new(Some(sender.clone() as Arc<dyn MessageSender>)))
}

fn post(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(SUBMIT_PATH)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Submit Lead
// ═══════════════════════════════════════════════════════════════════

mod submit_lead {
    use super::*;

    #[tokio::test]
    async fn valid_submission_is_relayed_once() {
        let sender = Arc::new(RecordingSender::default());
        let body = r#"{"source":"instagram","timestamp":"2024-06-10T14:30:00Z","userAgent":"Mozilla/5.0 (Linux; Android 14) Mobile"}"#;

        let response = router_with(&sender).oneshot(post(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response_json(response).await,
            json!({ "success": true, "message": "Lead submitted successfully" })
        );
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Instagram"));
        assert!(sent[0].contains("2024-06-10 18:00"));
        assert!(sent[0].contains("Android mobile"));
    }

    #[tokio::test]
    async fn missing_source_is_rejected_without_outbound_call() {
        let sender = Arc::new(RecordingSender::default());

        let response = router_with(&sender)
            .oneshot(post(r#"{"timestamp":"2024-06-10T14:30:00Z"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response_json(response).await, json!({ "error": "Source is required" }));
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn blank_source_counts_as_missing() {
        let sender = Arc::new(RecordingSender::default());
        let response = router_with(&sender).oneshot(post(r#"{"source":"  "}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let sender = Arc::new(RecordingSender::default());
        let response = router_with(&sender).oneshot(post("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response_json(response).await, json!({ "error": "Invalid JSON body" }));
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn wrong_method_is_405() {
        let sender = Arc::new(RecordingSender::default());
        let request = Request::builder()
            .method(Method::GET)
            .uri(SUBMIT_PATH)
            .body(Body::empty())
            .unwrap();

        let response = router_with(&sender).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response_json(response).await, json!({ "error": "Method not allowed" }));
    }

    #[tokio::test]
    async fn missing_credentials_is_configuration_error() {
        let app = build_router(RelayState::new(None));
        let response = app.oneshot(post(r#"{"source":"google"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response_json(response).await, json!({ "error": "Server configuration error" }));
    }

    #[tokio::test]
    async fn missing_source_checked_before_credentials() {
        let app = build_router(RelayState::new(None));
        let response = app.oneshot(post("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn downstream_failure_reports_details() {
        let sender = Arc::new(RecordingSender::failing());
        let response = router_with(&sender)
            .oneshot(post(r#"{"source":"youtube"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response_json(response).await,
            json!({ "error": "Internal server error", "details": "Failed to send to Telegram" })
        );
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_posts_produce_duplicate_messages() {
        let sender = Arc::new(RecordingSender::default());
        let app = router_with(&sender);

        for _ in 0..2 {
            let response = app.clone().oneshot(post(r#"{"source":"friend"}"#)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(sender.sent().len(), 2);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Health
// ═══════════════════════════════════════════════════════════════════

mod health {
    use super::*;

    #[tokio::test]
    async fn healthz_reports_ok() {
        let app = build_router(RelayState::new(None));
        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, json!({ "ok": true }));
    }
}
