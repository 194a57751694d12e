//! Notification channels.
//!
//! The set of channels is fixed:
//! - Console (standard output)
//! - Telegram Bot API
//! - Pushbullet pushes
//! - Email (SMTP with STARTTLS)

mod console;
mod email;
mod pushbullet;
mod telegram;

pub use console::ConsoleChannel;
pub use email::{EmailChannel, EmailConfig};
pub use pushbullet::{PushbulletChannel, PushbulletConfig};
pub use telegram::{TelegramChannel, TelegramConfig};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::message::AlertMessage;
use crate::Result;

/// Trait for notification channels.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Get the channel type name.
    fn channel_type(&self) -> &'static str;

    /// Whether the channel has everything it needs to deliver.
    fn is_enabled(&self) -> bool;

    /// Send a message through this channel.
    ///
    /// A disabled channel returns `Ok(())` without touching the network.
    async fn send(&self, message: &AlertMessage) -> Result<()>;

    /// Send a fixed test message.
    async fn test(&self) -> Result<()> {
        self.send(&AlertMessage::test(chrono::Local::now())).await
    }

    /// Best-effort delivery: never fails, whatever `send` reports.
    async fn deliver(&self, message: &AlertMessage) {
        if let Err(e) = self.send(message).await {
            debug!(
                channel = self.channel_type(),
                error = %e,
                "Notification delivery failed"
            );
        }
    }
}

/// Channel configuration wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChannelConfig {
    /// Standard output.
    Console,
    /// Telegram Bot API channel.
    Telegram(TelegramConfig),
    /// Pushbullet push channel.
    Pushbullet(PushbulletConfig),
    /// Email channel.
    Email(EmailConfig),
}

impl ChannelConfig {
    /// Get the channel type name.
    pub fn channel_type(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Telegram(_) => "telegram",
            Self::Pushbullet(_) => "pushbullet",
            Self::Email(_) => "email",
        }
    }

    /// Build the runtime channel.
    pub fn build(self) -> Arc<dyn NotificationChannel> {
        match self {
            Self::Console => Arc::new(ConsoleChannel::new()),
            Self::Telegram(c) => Arc::new(TelegramChannel::new(c)),
            Self::Pushbullet(c) => Arc::new(PushbulletChannel::new(c)),
            Self::Email(c) => Arc::new(EmailChannel::new(c)),
        }
    }
}
