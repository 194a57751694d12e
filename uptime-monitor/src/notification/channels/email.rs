//! Email notification channel using SMTP.
//!
//! Every send opens a fresh session: connect, upgrade with STARTTLS,
//! authenticate, deliver one plain-text message.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::NotificationChannel;
use crate::Result;
use crate::notification::message::AlertMessage;
use crate::utils::http_client::install_rustls_provider;

/// Email channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP server host.
    pub smtp_host: String,
    /// SMTP server port.
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_username: String,
    /// SMTP password.
    pub smtp_password: String,
    /// Sender address. Falls back to the username.
    #[serde(default)]
    pub from_address: Option<String>,
    /// Recipient address.
    pub to_address: String,
    /// Session timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    15
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: None,
            to_address: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Email notification channel.
pub struct EmailChannel {
    config: EmailConfig,
}

impl EmailChannel {
    /// Create a new Email channel.
    pub fn new(config: EmailConfig) -> Self {
        install_rustls_provider();
        Self { config }
    }

    fn sender(&self) -> &str {
        self.config
            .from_address
            .as_deref()
            .filter(|from| !from.is_empty())
            .unwrap_or(&self.config.smtp_username)
    }

    /// Build the plain-text message.
    fn build_email(&self, message: &AlertMessage) -> Result<Message> {
        let from: Mailbox = self.sender().parse()?;
        let to: Mailbox = self.config.to_address.parse()?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())?;
        Ok(email)
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let credentials = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
            .port(self.config.smtp_port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(self.config.timeout_secs)))
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn channel_type(&self) -> &'static str {
        "email"
    }

    fn is_enabled(&self) -> bool {
        !self.config.smtp_host.is_empty()
            && self.config.smtp_port != 0
            && !self.config.smtp_username.is_empty()
            && !self.config.smtp_password.is_empty()
            && !self.config.to_address.is_empty()
    }

    async fn send(&self, message: &AlertMessage) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let email = self.build_email(message)?;
        let transport = self.build_transport()?;

        // Bounds the whole session, not just each SMTP command.
        let session = Duration::from_secs(self.config.timeout_secs);
        tokio::time::timeout(session, transport.send(email))
            .await
            .map_err(|_| {
                crate::Error::delivery(
                    "email",
                    format!("SMTP session timed out after {}s", session.as_secs()),
                )
            })??;

        debug!(
            to = %self.config.to_address,
            "Email notification sent: {}", message.severity
        );
        Ok(())
    }
}
