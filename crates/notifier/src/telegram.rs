//! Telegram Bot API transport using raw reqwest (no framework).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{ChatTransport, NotifyError};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram Bot API client, send-only.
pub struct TelegramTransport {
    bot_token: String,
    api_base: String,
    client: reqwest::Client,
}

// --- Telegram API response envelope ---

#[derive(Debug, Deserialize)]
struct TgResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramTransport {
    pub fn new(bot_token: String, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            bot_token,
            api_base: DEFAULT_API_BASE.to_string(),
            client,
        })
    }

    /// Point the client at a different Bot API server (self-hosted or a test double).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }
}

/// Interpret the `{ok, description}` envelope every Bot API method returns.
fn check_envelope(body: TgResponse) -> Result<(), NotifyError> {
    if body.ok {
        Ok(())
    } else {
        Err(NotifyError::Rejected {
            description: body
                .description
                .unwrap_or_else(|| "no description".to_string()),
        })
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| e.without_url())?;

        // Error replies (400, 403, 429...) still carry the envelope with a description.
        let body: TgResponse = resp.json().await.map_err(|e| e.without_url())?;
        check_envelope(body)
    }
}
