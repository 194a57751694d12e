//! Endpoint health monitoring.
//!
//! - [`state`]: failure streak and backoff bookkeeping
//! - [`service`]: the probe / alert / sleep loop

pub mod service;
pub mod state;

pub use service::{HealthMonitor, alert_for};
pub use state::{BACKOFF_MULTIPLIER, MAX_BACKOFF_FACTOR, MonitorState, Transition};
