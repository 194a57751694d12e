//! uptime-monitor library crate.
//!
//! Probes one endpoint on an adaptive schedule and fans alerts out to the
//! console, Telegram, Pushbullet and email when it fails or recovers.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod notification;
pub mod probe;
pub mod utils;

pub use config::{MonitorConfig, NotificationChannelConfig};
pub use error::{Error, Result};
pub use monitor::HealthMonitor;
pub use probe::{HttpProber, ProbeOutcome, Prober};
