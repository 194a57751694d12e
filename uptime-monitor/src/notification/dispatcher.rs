//! Fan-out of alerts to every configured channel.

use std::sync::Arc;

use tracing::debug;

use super::channels::{ChannelConfig, NotificationChannel};
use super::message::AlertMessage;
use crate::Result;

/// Ordered set of notification channels.
///
/// Channels are invoked one after another in insertion order; a failing
/// channel never affects the ones after it.
#[derive(Clone, Default)]
pub struct Dispatcher {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    /// Build the runtime channels from their configurations, keeping order.
    pub fn from_configs(configs: impl IntoIterator<Item = ChannelConfig>) -> Self {
        Self::new(configs.into_iter().map(ChannelConfig::build).collect())
    }

    pub fn add_channel(&mut self, channel: Arc<dyn NotificationChannel>) {
        self.channels.push(channel);
    }

    pub fn channels(&self) -> &[Arc<dyn NotificationChannel>] {
        &self.channels
    }

    /// Types of the channels that will actually deliver.
    pub fn enabled_channels(&self) -> Vec<&'static str> {
        self.channels
            .iter()
            .filter(|c| c.is_enabled())
            .map(|c| c.channel_type())
            .collect()
    }

    /// Deliver `message` through every channel. Never fails.
    pub async fn dispatch(&self, message: AlertMessage) {
        for channel in &self.channels {
            channel.deliver(&message).await;
        }
        debug!(
            severity = %message.severity,
            channels = self.channels.len(),
            "Alert dispatched"
        );
    }

    /// Send a test message through every enabled channel and collect the
    /// per-channel results.
    pub async fn test_all(&self) -> Vec<(&'static str, Result<()>)> {
        let mut results = Vec::new();
        for channel in self.channels.iter().filter(|c| c.is_enabled()) {
            results.push((channel.channel_type(), channel.test().await));
        }
        results
    }
}
