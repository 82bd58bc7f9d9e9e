use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::message::{self, LeadSubmission};
use crate::sender::{MessageSender, TelegramSender};

pub const SUBMIT_PATH: &str = "/api/submit-lead";

#[derive(Clone)]
pub struct RelayState {
    /// `None` when credentials are not configured.
    sender: Option<Arc<dyn MessageSender>>,
}

impl RelayState {
    pub fn new(sender: Option<Arc<dyn MessageSender>>) -> Self {
        Self { sender }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        let sender = TelegramSender::from_config(config)
            .map(|s| Arc::new(s) as Arc<dyn MessageSender>);
        if sender.is_none() {
            tracing::warn!("Telegram credentials not configured, submissions will fail");
        }
        Self::new(sender)
    }
}

pub fn build_router(state: RelayState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(SUBMIT_PATH, post(submit_lead).fallback(method_not_allowed))
        .with_state(state)
}

/// Bind `config.bind_addr` and serve until the process is stopped.
pub async fn serve(config: RelayConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "lead relay listening");
    axum::serve(listener, build_router(RelayState::from_config(&config))).await
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}

async fn submit_lead(State(state): State<RelayState>, body: Bytes) -> Response {
    match relay(&state, &body).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Lead submitted successfully" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

async fn relay(state: &RelayState, body: &[u8]) -> Result<(), RelayError> {
    let submission: LeadSubmission =
        serde_json::from_slice(body).map_err(|e| RelayError::InvalidBody(e.to_string()))?;
    let source = submission.source().ok_or(RelayError::MissingSource)?;
    let sender = state.sender.as_ref().ok_or(RelayError::NotConfigured)?;

    let text = message::compose(&submission, source);
    sender.send(&text).await?;

    tracing::info!(source, sender = sender.name(), "lead relayed");
    Ok(())
}
