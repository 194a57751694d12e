//! Failure streak and backoff tracking.
//!
//! [`MonitorState`] is the pure part of the monitor: it consumes one
//! [`ProbeOutcome`] per iteration and reports which [`Transition`] happened.
//! It performs no I/O, which keeps every property of the loop testable
//! without a network.

use std::time::Duration;

use tracing::{debug, warn};

use crate::probe::ProbeOutcome;

/// Multiplier applied to the backoff after every failed probe.
pub const BACKOFF_MULTIPLIER: f64 = 1.8;

/// Upper bound of the backoff, as a multiple of the base interval.
pub const MAX_BACKOFF_FACTOR: u32 = 10;

/// What a single probe outcome did to the monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Healthy after healthy. Nothing to notify.
    StillHealthy { code: u16 },
    /// First healthy outcome after a failure streak of `failures` probes.
    Recovered { code: u16, failures: u32 },
    /// Unhealthy status; `count` is the streak length including this probe.
    Failed { count: u32, code: u16 },
    /// Transport error; shares the streak with `Failed`.
    Errored { count: u32, description: String },
}

impl Transition {
    /// Whether this transition results in a dispatched alert.
    pub fn is_notifiable(&self) -> bool {
        !matches!(self, Self::StillHealthy { .. })
    }
}

/// Health state carried across loop iterations.
#[derive(Debug, Clone)]
pub struct MonitorState {
    consecutive_failures: u32,
    current_backoff: Duration,
    base_interval: Duration,
    max_backoff: Duration,
}

impl MonitorState {
    /// Start healthy, sleeping `base_interval` between probes.
    pub fn new(base_interval: Duration) -> Self {
        Self {
            consecutive_failures: 0,
            current_backoff: base_interval,
            base_interval,
            max_backoff: base_interval.saturating_mul(MAX_BACKOFF_FACTOR),
        }
    }

    /// Record a probe outcome and return the resulting transition.
    pub fn record(&mut self, outcome: ProbeOutcome) -> Transition {
        match outcome {
            ProbeOutcome::Healthy(code) => {
                let failures = self.consecutive_failures;
                self.consecutive_failures = 0;
                self.current_backoff = self.base_interval;

                if failures > 0 {
                    debug!(failures, "endpoint recovered");
                    Transition::Recovered { code, failures }
                } else {
                    Transition::StillHealthy { code }
                }
            }
            ProbeOutcome::Unhealthy(code) => {
                let count = self.register_failure();
                Transition::Failed { count, code }
            }
            ProbeOutcome::Errored(description) => {
                let count = self.register_failure();
                Transition::Errored { count, description }
            }
        }
    }

    fn register_failure(&mut self) -> u32 {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        let previous = self.current_backoff;
        self.current_backoff = next_backoff(previous, self.base_interval, self.max_backoff);

        if self.current_backoff == self.max_backoff && previous != self.max_backoff {
            warn!(
                failures = self.consecutive_failures,
                backoff_secs = self.current_backoff.as_secs(),
                "backoff at maximum"
            );
        }
        self.consecutive_failures
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Delay before the next probe.
    pub fn current_backoff(&self) -> Duration {
        self.current_backoff
    }

    pub fn base_interval(&self) -> Duration {
        self.base_interval
    }

    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    /// At least one failure in the current streak.
    pub fn is_degraded(&self) -> bool {
        self.consecutive_failures > 0
    }
}

/// Grow `current` by [`BACKOFF_MULTIPLIER`], rounded down to whole seconds
/// and clamped to `[base, max]`.
pub fn next_backoff(current: Duration, base: Duration, max: Duration) -> Duration {
    let grown = (current.as_secs_f64() * BACKOFF_MULTIPLIER).floor() as u64;
    Duration::from_secs(grown).clamp(base, max)
}
