// =============================================================================
// Telegram Bot API notifier
// =============================================================================
//
// POST https://api.telegram.org/bot<token>/sendMessage  { chat_id, text }
//
// SECURITY: the bot token is part of the request URL and is never logged.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use super::Notifier;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Clone)]
pub struct TelegramNotifier {
    api_base: String,
    token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self> {
        Self::with_api_base(DEFAULT_API_BASE, token, chat_id)
    }

    pub fn with_api_base(
        api_base: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            api_base: api_base.into(),
            token: token.into(),
            chat_id: chat_id.into(),
            client,
        })
    }

    /// Build from `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`.  Returns
    /// `Ok(None)` when either is unset or blank.
    pub fn from_env() -> Result<Option<Self>> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").unwrap_or_default();
        if token.trim().is_empty() || chat_id.trim().is_empty() {
            return Ok(None);
        }
        Self::new(token.trim(), chat_id.trim()).map(Some)
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    #[instrument(skip(self, text), name = "telegram::send")]
    async fn send(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
        };

        let resp = self
            .client
            .post(self.send_message_url())
            .json(&payload)
            .send()
            .await
            // reqwest errors embed the URL, and the URL embeds the token.
            .map_err(|e| anyhow::anyhow!("Telegram sendMessage request failed: {}", e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram sendMessage returned {}: {}", status, body);
        }

        debug!(chars = text.chars().count(), "alert delivered to Telegram");
        Ok(())
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}
