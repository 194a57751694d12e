//! Alert messages.
//!
//! Defines the message handed to every notification channel and the
//! severity labels that select its subject line.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Title used by channels that show a short heading (push notifications).
pub const ALERT_TITLE: &str = "Uptime";

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The endpoint is healthy again after a failure streak.
    Recovery,
    /// The endpoint answered with an unhealthy status.
    Failure,
    /// The endpoint could not be reached at all.
    Error,
    /// Channel self-test.
    Test,
}

impl Severity {
    /// Label used in message bodies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Recovery => "RECOVERY",
            Self::Failure => "FAIL",
            Self::Error => "ERROR",
            Self::Test => "TEST",
        }
    }

    /// Subject line used by email.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Recovery => "Uptime Recovery",
            Self::Failure => "Uptime Alert",
            Self::Error => "Uptime Error",
            Self::Test => "Uptime Test",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single alert, built when a notifiable transition happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertMessage {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub body: String,
}

/// Format a timestamp the way status and alert lines show it.
pub fn clock(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%H:%M:%S").to_string()
}

impl AlertMessage {
    /// `HH:MM:SS RECOVERY: <url> is back (status <code>)`
    pub fn recovery(timestamp: DateTime<Local>, url: &str, code: u16) -> Self {
        let body = format!(
            "{} {}: {url} is back (status {code})",
            clock(&timestamp),
            Severity::Recovery
        );
        Self {
            timestamp,
            severity: Severity::Recovery,
            body,
        }
    }

    /// `HH:MM:SS FAIL#<n>: status <code> at <url>`
    pub fn failure(timestamp: DateTime<Local>, url: &str, count: u32, code: u16) -> Self {
        let body = format!(
            "{} {}#{count}: status {code} at {url}",
            clock(&timestamp),
            Severity::Failure
        );
        Self {
            timestamp,
            severity: Severity::Failure,
            body,
        }
    }

    /// `HH:MM:SS ERROR#<n>: <description> at <url>`
    pub fn error(timestamp: DateTime<Local>, url: &str, count: u32, description: &str) -> Self {
        let body = format!(
            "{} {}#{count}: {description} at {url}",
            clock(&timestamp),
            Severity::Error
        );
        Self {
            timestamp,
            severity: Severity::Error,
            body,
        }
    }

    pub fn test(timestamp: DateTime<Local>) -> Self {
        let body = format!(
            "{} {}: notification channel test from uptime-monitor",
            clock(&timestamp),
            Severity::Test
        );
        Self {
            timestamp,
            severity: Severity::Test,
            body,
        }
    }

    pub fn subject(&self) -> &'static str {
        self.severity.subject()
    }

    pub fn title(&self) -> &'static str {
        ALERT_TITLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap()
    }

    #[test]
    fn test_recovery_body() {
        let msg = AlertMessage::recovery(at_noon(), "https://example.com", 200);
        assert_eq!(msg.body, "12:34:56 RECOVERY: https://example.com is back (status 200)");
        assert_eq!(msg.subject(), "Uptime Recovery");
    }

    #[test]
    fn test_failure_body() {
        let msg = AlertMessage::failure(at_noon(), "https://example.com", 3, 502);
        assert_eq!(msg.body, "12:34:56 FAIL#3: status 502 at https://example.com");
        assert_eq!(msg.subject(), "Uptime Alert");
    }

    #[test]
    fn test_error_body_has_description_and_no_status() {
        let msg = AlertMessage::error(at_noon(), "https://example.com", 1, "connection refused");
        assert!(msg.body.contains("ERROR#1"));
        assert!(msg.body.contains("connection refused"));
        assert!(!msg.body.contains("status"));
        assert_eq!(msg.subject(), "Uptime Error");
    }

    #[test]
    fn test_title_is_shared() {
        let msg = AlertMessage::test(at_noon());
        assert_eq!(msg.title(), "Uptime");
        assert_eq!(msg.severity, Severity::Test);
    }
}
