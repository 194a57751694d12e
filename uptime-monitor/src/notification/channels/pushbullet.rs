//! Pushbullet notification channel.
//!
//! Creates a `note` push via `POST /v2/pushes`, authenticated with the
//! `Access-Token` header.

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

pub const PUSHBULLET_API_BASE: &str = "https://api.pushbullet.com";

/// Pushbullet channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushbulletConfig {
    /// Pushbullet access token.
    pub access_token: String,
    /// API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    PUSHBULLET_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for PushbulletConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Pushbullet notification channel.
pub struct PushbulletChannel {
    config: PushbulletConfig,
    client: Client,
}

impl PushbulletChannel {
    pub fn new(config: PushbulletConfig) -> Self {
        let client = build_client(Duration::from_secs(config.timeout_secs));
        Self { config, client }
    }

    fn build_payload(&self, message: &AlertMessage) -> serde_json::Value {
        json!({
            "type": "note",
            "title": message.title(),
            "body": message.body,
        })
    }
}

#[async_trait]
impl NotificationChannel for PushbulletChannel {
    fn channel_type(&self) -> &'static str {
        "pushbullet"
    }

    fn is_enabled(&self) -> bool {
        !self.config.access_token.is_empty()
    }

    async fn send(&self, message: &AlertMessage) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let url = format!("{}/v2/pushes", self.config.api_base.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("Access-Token", &self.config.access_token)
            .json(&self.build_payload(message))
            .send()
            .await
            .map_err(|e| {
                crate::Error::delivery("pushbullet", format!("request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Pushbullet push failed: {} - {}", status, body);
            return Err(crate::Error::delivery(
                "pushbullet",
                format!("push returned {status}: {body}"),
            ));
        }

        debug!("Pushbullet notification sent: {}", message.severity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_pushbullet_disabled_without_token() {
        let channel = PushbulletChannel::new(PushbulletConfig::default());
        assert!(!channel.is_enabled());
    }

    #[test]
    fn test_build_payload() {
        let channel = PushbulletChannel::new(PushbulletConfig::default());
        let message = AlertMessage::recovery(chrono::Local::now(), "https://example.com", 200);
        let payload = channel.build_payload(&message);

        assert_eq!(payload["type"], "note");
        assert_eq!(payload["title"], "Uptime");
        assert_eq!(payload["body"], message.body.as_str());
    }

    #[tokio::test]
    async fn test_send_uses_access_token_header() {
        let mut server = mockito::Server::new_async().await;
        let message = AlertMessage::error(
            chrono::Local::now(),
            "https://example.com",
            2,
            "connection refused",
        );
        let mock = server
            .mock("POST", "/v2/pushes")
            .match_header("access-token", "o.secret")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "type": "note",
                "title": "Uptime",
                "body": message.body,
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let channel = PushbulletChannel::new(PushbulletConfig {
            access_token: "o.secret".to_string(),
            api_base: server.url(),
            ..Default::default()
        });
        channel.send(&message).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_server_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/pushes")
            .with_status(500)
            .create_async()
            .await;

        let channel = PushbulletChannel::new(PushbulletConfig {
            access_token: "o.secret".to_string(),
            api_base: server.url(),
            ..Default::default()
        });
        let message = AlertMessage::test(chrono::Local::now());

        let err = channel.send(&message).await.unwrap_err();
        assert!(err.to_string().contains("pushbullet"));
        channel.deliver(&message).await;
    }
}
