//! Command line arguments.
//!
//! Every option can also come from the environment (and therefore from a
//! `.env` file loaded by the binary).

use std::time::Duration;

use clap::Parser;

use crate::Result;
use crate::config::{
    DEFAULT_INTERVAL_SECS, DEFAULT_SMTP_PORT, DEFAULT_TIMEOUT_SECS, MonitorConfig,
    NotificationChannelConfig,
};
use crate::notification::channels::{EmailConfig, PushbulletConfig, TelegramConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "uptime-monitor")]
#[command(about = "Probe an endpoint and alert on failure and recovery")]
#[command(version)]
pub struct Args {
    /// URL to probe
    #[arg(long, env = "UPTIME_URL")]
    pub url: String,

    /// Polling interval in seconds (also the minimum backoff)
    #[arg(long, env = "UPTIME_INTERVAL", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval: u64,

    /// Per-probe timeout in seconds
    #[arg(long, env = "UPTIME_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Telegram bot token
    #[arg(long, env = "TG_TOKEN", default_value = "", hide_env_values = true)]
    pub telegram_token: String,

    /// Telegram chat id
    #[arg(long, env = "TG_CHAT", default_value = "")]
    pub telegram_chat: String,

    /// Pushbullet access token
    #[arg(long, env = "PB_TOKEN", default_value = "", hide_env_values = true)]
    pub pushbullet_token: String,

    /// SMTP server host
    #[arg(long, env = "SMTP_HOST", default_value = "")]
    pub smtp_host: String,

    /// SMTP server port
    #[arg(long, env = "SMTP_PORT", default_value_t = DEFAULT_SMTP_PORT)]
    pub smtp_port: u16,

    /// SMTP username
    #[arg(long, env = "SMTP_USER", default_value = "")]
    pub smtp_user: String,

    /// SMTP password
    #[arg(long, env = "SMTP_PASS", default_value = "", hide_env_values = true)]
    pub smtp_pass: String,

    /// Sender address (defaults to the SMTP username)
    #[arg(long, env = "SMTP_FROM")]
    pub smtp_from: Option<String>,

    /// Alert recipient address
    #[arg(long, env = "EMAIL_TO", default_value = "")]
    pub email_to: String,

    /// Send a test alert through every configured channel and exit
    #[arg(long)]
    pub test_notify: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Validated monitor configuration.
    pub fn monitor_config(&self) -> Result<MonitorConfig> {
        let config = MonitorConfig::new(
            self.url.trim(),
            Duration::from_secs(self.interval),
            Duration::from_secs(self.timeout),
        );
        config.validate()?;
        Ok(config)
    }

    pub fn channel_config(&self) -> NotificationChannelConfig {
        NotificationChannelConfig {
            telegram: TelegramConfig {
                bot_token: self.telegram_token.clone(),
                chat_id: self.telegram_chat.clone(),
                ..Default::default()
            },
            pushbullet: PushbulletConfig {
                access_token: self.pushbullet_token.clone(),
                ..Default::default()
            },
            email: EmailConfig {
                smtp_host: self.smtp_host.clone(),
                smtp_port: self.smtp_port,
                smtp_username: self.smtp_user.clone(),
                smtp_password: self.smtp_pass.clone(),
                from_address: self.smtp_from.clone(),
                to_address: self.email_to.clone(),
                ..Default::default()
            },
        }
    }
}
