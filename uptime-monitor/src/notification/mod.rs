//! Notification system module.
//!
//! Alerts are fanned out to a fixed, ordered set of channels: console,
//! Telegram, Pushbullet and email. Delivery is best-effort: a channel that is
//! not configured does nothing, and a channel that fails is skipped silently.
//!
//! # Example
//!
//! ```ignore
//! use uptime_monitor::notification::{AlertMessage, ChannelConfig, Dispatcher};
//! use uptime_monitor::notification::channels::TelegramConfig;
//!
//! let dispatcher = Dispatcher::from_configs(vec![
//!     ChannelConfig::Console,
//!     ChannelConfig::Telegram(TelegramConfig {
//!         bot_token: "123:ABC".to_string(),
//!         chat_id: "456".to_string(),
//!         ..Default::default()
//!     }),
//! ]);
//!
//! dispatcher.dispatch(AlertMessage::test(chrono::Local::now())).await;
//! ```

pub mod channels;
pub mod dispatcher;
pub mod message;

pub use channels::{ChannelConfig, NotificationChannel};
pub use dispatcher::Dispatcher;
pub use message::{AlertMessage, Severity};
