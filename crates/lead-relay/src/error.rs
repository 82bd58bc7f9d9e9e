use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Everything a lead submission can fail with. Each variant maps to one
/// HTTP status and JSON error body.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("Source is required")]
    MissingSource,

    #[error("Telegram credentials not configured")]
    NotConfigured,

    #[error("{0}")]
    Downstream(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::InvalidBody(_) | RelayError::MissingSource => StatusCode::BAD_REQUEST,
            RelayError::NotConfigured | RelayError::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        RelayError::Downstream(e.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = match &self {
            RelayError::MethodNotAllowed => json!({ "error": "Method not allowed" }),
            RelayError::InvalidBody(_) => json!({ "error": "Invalid JSON body" }),
            RelayError::MissingSource => json!({ "error": "Source is required" }),
            RelayError::NotConfigured => {
                tracing::error!("Telegram credentials not configured");
                json!({ "error": "Server configuration error" })
            }
            RelayError::Downstream(details) => {
                tracing::error!(error = %details, "failed to relay lead");
                json!({ "error": "Internal server error", "details": details })
            }
        };
        (self.status(), Json(body)).into_response()
    }
}
