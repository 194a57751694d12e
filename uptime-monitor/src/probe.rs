//! Health probe against the monitored endpoint.
//!
//! A probe issues exactly one request and classifies what came back. It never
//! retries and never returns an error: transport failures become
//! [`ProbeOutcome::Errored`] so the monitor loop can treat them as part of the
//! failure streak.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::utils::http_client::{build_client, describe_error};

/// Result of a single health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The endpoint answered with a status in `[200, 400)`.
    Healthy(u16),
    /// The endpoint answered with any other status.
    Unhealthy(u16),
    /// No response was received (connect, DNS, TLS, timeout...).
    Errored(String),
}

impl ProbeOutcome {
    /// Classify a received HTTP status code.
    pub fn from_status(code: u16) -> Self {
        if (200..400).contains(&code) {
            Self::Healthy(code)
        } else {
            Self::Unhealthy(code)
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy(_))
    }

    /// Status code of the response, if one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Healthy(code) | Self::Unhealthy(code) => Some(*code),
            Self::Errored(_) => None,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy(code) => write!(f, "healthy ({code})"),
            Self::Unhealthy(code) => write!(f, "unhealthy ({code})"),
            Self::Errored(description) => write!(f, "errored ({description})"),
        }
    }
}

/// Something that can probe an endpoint.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Issue one request against `url`, bounded by `timeout`.
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome;
}

/// HTTP GET prober backed by a shared `reqwest` client.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new() -> Self {
        // Per-request timeouts are applied in `probe`.
        Self {
            client: build_client(Duration::ZERO),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        match self.client.get(url).timeout(timeout).send().await {
            Ok(response) => {
                let status = response.status();
                debug!(%url, status = status.as_u16(), "health probe answered");
                ProbeOutcome::from_status(status.as_u16())
            }
            Err(e) => {
                let description = if e.is_timeout() {
                    format!("request timed out after {}s", timeout.as_secs_f64())
                } else {
                    describe_error(&e)
                };
                debug!(%url, error = %description, "health probe failed");
                ProbeOutcome::Errored(description)
            }
        }
    }
}
