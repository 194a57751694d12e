//! Logging setup.
//!
//! Diagnostics go to stderr through `tracing`; stdout carries only the
//! status and alert lines.

use chrono::Local;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "uptime_monitor=info";

/// Timer that formats timestamps in the local timezone.
#[derive(Debug, Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Default directive for the requested verbosity.
pub fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "uptime_monitor=debug"
    } else if quiet {
        "uptime_monitor=warn"
    } else {
        DEFAULT_LOG_FILTER
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the flags.
pub fn init_logging(verbose: bool, quiet: bool) -> crate::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_timer(LocalTimer)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| crate::Error::Other(format!("Failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false, false), DEFAULT_LOG_FILTER);
        assert_eq!(default_filter(true, false), "uptime_monitor=debug");
        assert_eq!(default_filter(false, true), "uptime_monitor=warn");
    }

    #[test]
    fn test_filters_parse() {
        for directive in [
            default_filter(false, false),
            default_filter(true, false),
            default_filter(false, true),
        ] {
            assert!(EnvFilter::try_new(directive).is_ok());
        }
    }
}
