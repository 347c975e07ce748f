//! User-visible notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Error,
}

/// A message shown to the user by the editor side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Fire-and-forget notification sink; every message is logged and fanned out
/// to current subscribers.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        info!("notify: {}", message);
        self.send(Level::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        error!("notify: {}", message);
        self.send(Level::Error, message);
    }

    fn send(&self, level: Level, message: String) {
        // No subscribers is fine; the message was already logged
        let _ = self.tx.send(Notification {
            level,
            message,
            timestamp: Utc::now(),
        });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(64)
    }
}
