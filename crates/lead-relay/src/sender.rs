use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::RelayConfig;
use crate::error::RelayError;

const API_BASE: &str = "https://api.telegram.org";

/// Outbound channel for lead notifications.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Human-readable name of this sender (for logs).
    fn name(&self) -> &str;

    /// Deliver one message. No retries.
    async fn send(&self, text: &str) -> Result<(), RelayError>;
}

/// Posts messages to a chat through the Telegram Bot API.
pub struct TelegramSender {
    client: Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramSender {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: API_BASE.to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// `None` when the token or chat id is missing.
    pub fn from_config(config: &RelayConfig) -> Option<Self> {
        config
            .credentials()
            .map(|(token, chat_id)| Self::new(token, chat_id))
    }

    /// Point at another Bot API host (local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.token)
    }
}

// ── Telegram API response types ─────────────────────────────────────

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    description: Option<String>,
}

#[async_trait]
impl MessageSender for TelegramSender {
    fn name(&self) -> &str {
        "Telegram"
    }

    async fn send(&self, text: &str) -> Result<(), RelayError> {
        let resp = self
            .client
            .post(self.endpoint())
            .json(&json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": "Markdown",
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp
                .json::<ApiError>()
                .await
                .ok()
                .and_then(|e| e.description)
                .unwrap_or_default();
            tracing::error!(%status, detail = %detail, "Telegram API error");
            return Err(RelayError::Downstream("Failed to send to Telegram".to_string()));
        }
        Ok(())
    }
}
