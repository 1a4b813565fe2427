//! User-facing status line
//!
//! The popup shows one status message at a time. The board keeps the latest
//! update in a watch channel so any number of views can follow it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Neutral,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub text: String,
    pub severity: Severity,
    pub at: DateTime<Utc>,
}

impl StatusUpdate {
    fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
            at: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub struct StatusBoard {
    tx: watch::Sender<StatusUpdate>,
}

impl StatusBoard {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(StatusUpdate::new("", Severity::Neutral));
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusUpdate> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> StatusUpdate {
        self.tx.borrow().clone()
    }

    pub fn loading(&self, text: impl Into<String>) {
        self.publish(StatusUpdate::new(text, Severity::Loading));
    }

    pub fn success(&self, text: impl Into<String>) {
        self.publish(StatusUpdate::new(text, Severity::Success));
    }

    /// Publish `message` as "Error: <message>"
    pub fn error(&self, message: impl std::fmt::Display) {
        self.publish(StatusUpdate::new(format!("Error: {message}"), Severity::Error));
    }

    fn publish(&self, update: StatusUpdate) {
        tracing::debug!(severity = ?update.severity, text = %update.text, "Status");
        self.tx.send_replace(update);
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
