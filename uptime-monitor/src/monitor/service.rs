//! Health monitor service implementation.
//!
//! The HealthMonitor runs the probe loop: probe, record the outcome, alert on
//! notifiable transitions, sleep for the current backoff, repeat.

use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use super::state::{MonitorState, Transition};
use crate::config::MonitorConfig;
use crate::notification::message::clock;
use crate::notification::channels::ConsoleChannel;
use crate::notification::{AlertMessage, Dispatcher};
use crate::probe::Prober;

/// Build the alert for a transition, or `None` when nothing should be sent.
pub fn alert_for(transition: &Transition, url: &str, now: DateTime<Local>) -> Option<AlertMessage> {
    match transition {
        Transition::StillHealthy { .. } => None,
        Transition::Recovered { code, .. } => Some(AlertMessage::recovery(now, url, *code)),
        Transition::Failed { count, code } => Some(AlertMessage::failure(now, url, *count, *code)),
        Transition::Errored { count, description } => {
            Some(AlertMessage::error(now, url, *count, description))
        }
    }
}

/// The health monitor service.
pub struct HealthMonitor<P: Prober> {
    config: MonitorConfig,
    prober: P,
    dispatcher: Dispatcher,
    state: MonitorState,
    /// Where healthy status lines go; standard output unless replaced.
    status: ConsoleChannel,
}

impl<P: Prober> HealthMonitor<P> {
    pub fn new(config: MonitorConfig, prober: P, dispatcher: Dispatcher) -> Self {
        let state = MonitorState::new(config.interval);
        Self {
            config,
            prober,
            dispatcher,
            state,
            status: ConsoleChannel::new(),
        }
    }

    /// Send status lines to `writer` instead of standard output.
    pub fn with_status_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.status = ConsoleChannel::with_writer(writer);
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Run one iteration without sleeping. Returns the delay before the
    /// next probe.
    pub async fn tick(&mut self) -> Duration {
        let url = self.config.url.as_str();
        let outcome = self.prober.probe(url, self.config.timeout).await;
        debug!(%url, %outcome, "probe finished");

        let transition = self.state.record(outcome);
        let now = Local::now();

        match &transition {
            Transition::StillHealthy { code } => {
                self.print_status(&format!("{} OK: {}", clock(&now), code));
            }
            Transition::Recovered { code, failures } => {
                info!(%url, code, failures, "endpoint recovered");
            }
            Transition::Failed { count, code } => {
                warn!(%url, code, failures = count, "endpoint unhealthy");
            }
            Transition::Errored { count, description } => {
                warn!(%url, error = %description, failures = count, "endpoint unreachable");
            }
        }

        if let Some(alert) = alert_for(&transition, url, now) {
            self.dispatcher.dispatch(alert).await;
        }

        let next = self.state.current_backoff();
        debug!(next_probe_secs = next.as_secs(), "sleeping until next probe");
        next
    }

    fn print_status(&self, line: &str) {
        if let Err(e) = self.status.write_line(line) {
            debug!(error = %e, "failed to write status line");
        }
    }

    /// Probe forever. Only returns if the surrounding task is dropped.
    pub async fn run(mut self) {
        info!(
            url = %self.config.url,
            interval_secs = self.config.interval.as_secs(),
            timeout_secs = self.config.timeout.as_secs(),
            channels = ?self.dispatcher.enabled_channels(),
            "Health monitor started"
        );
        self.print_status(&format!(
            "Monitoring {} every {}s",
            self.config.url,
            self.config.interval.as_secs()
        ));

        loop {
            let delay = self.tick().await;
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationChannel;
    use crate::probe::ProbeOutcome;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    struct ScriptedProber {
        outcomes: Mutex<VecDeque<ProbeOutcome>>,
    }

    impl ScriptedProber {
        fn new(outcomes: Vec<ProbeOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
            }
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, _url: &str, _timeout: Duration) -> ProbeOutcome {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(ProbeOutcome::Healthy(200))
        }
    }

    #[derive(Default)]
    struct Recorder {
        messages: Mutex<Vec<AlertMessage>>,
    }

    #[async_trait]
    impl NotificationChannel for Recorder {
        fn channel_type(&self) -> &'static str {
            "recorder"
        }

        fn is_enabled(&self) -> bool {
            true
        }

        async fn send(&self, message: &AlertMessage) -> crate::Result<()> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn monitor(
        interval: u64,
        outcomes: Vec<ProbeOutcome>,
    ) -> (HealthMonitor<ScriptedProber>, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let config = MonitorConfig::new(
            "https://example.com/health",
            Duration::from_secs(interval),
            Duration::from_secs(10),
        );
        let channel: Arc<dyn NotificationChannel> = recorder.clone();
        let dispatcher = Dispatcher::new(vec![channel]);
        (
            HealthMonitor::new(config, ScriptedProber::new(outcomes), dispatcher),
            recorder,
        )
    }

    #[tokio::test]
    async fn test_healthy_probe_sends_nothing() {
        let (mut monitor, recorder) = monitor(10, vec![ProbeOutcome::Healthy(200)]);

        let delay = monitor.tick().await;

        assert_eq!(delay, Duration::from_secs(10));
        assert!(recorder.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failures_and_recovery_are_alerted() {
        let (mut monitor, recorder) = monitor(
            10,
            vec![
                ProbeOutcome::Unhealthy(500),
                ProbeOutcome::Unhealthy(503),
                ProbeOutcome::Healthy(200),
            ],
        );

        assert_eq!(monitor.tick().await, Duration::from_secs(18));
        assert_eq!(monitor.tick().await, Duration::from_secs(32));
        assert_eq!(monitor.tick().await, Duration::from_secs(10));

        let messages = recorder.messages.lock().unwrap();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].body.contains("FAIL#1: status 500"));
        assert!(messages[1].body.contains("FAIL#2: status 503"));
        assert!(messages[2].body.contains("RECOVERY: https://example.com/health is back (status 200)"));
    }

    #[tokio::test]
    async fn test_error_alert_carries_description() {
        let (mut monitor, recorder) = monitor(
            10,
            vec![ProbeOutcome::Errored("connection refused".to_string())],
        );

        monitor.tick().await;

        let messages = recorder.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].body.contains("ERROR#1"));
        assert!(messages[0].body.contains("connection refused"));
        assert!(!messages[0].body.contains("status"));
        assert_eq!(monitor.state().consecutive_failures(), 1);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[tokio::test]
    async fn test_unwritable_stdout_does_not_stop_the_loop() {
        let (monitor, recorder) = monitor(
            10,
            vec![ProbeOutcome::Healthy(200), ProbeOutcome::Unhealthy(500)],
        );
        let mut monitor = monitor.with_status_writer(ClosedPipe);

        assert_eq!(monitor.tick().await, Duration::from_secs(10));
        assert_eq!(monitor.tick().await, Duration::from_secs(18));
        assert_eq!(recorder.messages.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_alert_for_still_healthy_is_none() {
        let transition = Transition::StillHealthy { code: 200 };
        assert!(alert_for(&transition, "https://example.com", Local::now()).is_none());
    }
}
