//! Immutable runtime configuration.
//!
//! Both values are built once at startup (see [`crate::cli`]) and handed to
//! the monitor; nothing reads the environment after that.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::monitor::state::MAX_BACKOFF_FACTOR;
use crate::notification::ChannelConfig;
use crate::notification::channels::{EmailConfig, PushbulletConfig, TelegramConfig};
use crate::{Error, Result};

pub const DEFAULT_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// What to probe and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Target URL.
    pub url: String,
    /// Base polling interval; also the backoff floor.
    pub interval: Duration,
    /// Per-probe timeout.
    pub timeout: Duration,
}

impl MonitorConfig {
    pub fn new(url: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            interval,
            timeout,
        }
    }

    /// Reject configurations the loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::config("target URL is required"));
        }
        let parsed = Url::parse(&self.url)
            .map_err(|e| Error::config(format!("invalid target URL '{}': {e}", self.url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported URL scheme '{}', expected http or https",
                parsed.scheme()
            )));
        }
        if self.interval.as_secs() == 0 {
            return Err(Error::config("interval must be at least 1 second"));
        }
        if self.interval.checked_mul(MAX_BACKOFF_FACTOR).is_none() {
            return Err(Error::config(format!(
                "interval of {}s is too large, the backoff ceiling ({}x interval) would overflow",
                self.interval.as_secs(),
                MAX_BACKOFF_FACTOR
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::config("timeout must be positive"));
        }
        Ok(())
    }
}

/// Credentials for every notification channel. Empty fields disable the
/// channel they belong to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationChannelConfig {
    pub telegram: TelegramConfig,
    pub pushbullet: PushbulletConfig,
    pub email: EmailConfig,
}

impl NotificationChannelConfig {
    /// Channel configurations in dispatch order: console, chat, push, email.
    pub fn channel_configs(&self) -> Vec<ChannelConfig> {
        vec![
            ChannelConfig::Console,
            ChannelConfig::Telegram(self.telegram.clone()),
            ChannelConfig::Pushbullet(self.pushbullet.clone()),
            ChannelConfig::Email(self.email.clone()),
        ]
    }
}
