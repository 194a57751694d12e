//! Telegram Bot API notification channel.
//!
//! Sends plain-text messages via `POST /bot<token>/sendMessage`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::NotificationChannel;
use crate::Result;
use crate::notification::message::AlertMessage;
use crate::utils::http_client::build_client;

/// Telegram `sendMessage` text limit (UTF-8 characters).
const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Telegram Bot API token.
    pub bot_token: String,
    /// Target chat ID (user, group, or channel).
    pub chat_id: String,
    /// Bot API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    TELEGRAM_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Telegram notification channel.
pub struct TelegramChannel {
    config: TelegramConfig,
    client: Client,
}

impl TelegramChannel {
    /// Create a new Telegram channel.
    pub fn new(config: TelegramConfig) -> Self {
        let client = build_client(Duration::from_secs(config.timeout_secs));
        Self { config, client }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn channel_type(&self) -> &'static str {
        "telegram"
    }

    fn is_enabled(&self) -> bool {
        !self.config.bot_token.is_empty() && !self.config.chat_id.is_empty()
    }

    async fn send(&self, message: &AlertMessage) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let payload = json!({
            "chat_id": self.config.chat_id,
            "text": truncate_message(&message.body, TELEGRAM_MESSAGE_LIMIT),
        });

        let response = self
            .client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            // The endpoint URL embeds the bot token.
            .map_err(|e| {
                crate::Error::delivery("telegram", format!("request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Telegram sendMessage failed: {} - {}", status, body);
            return Err(crate::Error::delivery(
                "telegram",
                format!("sendMessage returned {status}: {body}"),
            ));
        }

        debug!("Telegram notification sent: {}", message.severity);
        Ok(())
    }
}

/// Truncate a message to fit within the Telegram character limit.
fn truncate_message(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let suffix = "\n\n[truncated]";
    let budget = limit - suffix.len();
    let truncated: String = text.chars().take(budget).collect();
    format!("{truncated}{suffix}")
}
