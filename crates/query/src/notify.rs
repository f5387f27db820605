//! User-facing notifications (toasts).
//!
//! [`Notifications`] is a fan-out hub backed by a `tokio::sync::broadcast`
//! channel. Mutations publish one notification per outcome; views and the
//! console subscribe and render them.

use learnhub_core::types::Timestamp;
use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    /// One line, safe to show to the user.
    pub message: String,
    pub timestamp: Timestamp,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

pub struct Notifications {
    sender: broadcast::Sender<Notification>,
}

impl Notifications {
    /// When the buffer is full the oldest notifications are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, notification: Notification) {
        tracing::debug!(level = ?notification.level, message = %notification.message, "Notification");
        // Ignore the SendError: it only means there are zero receivers.
        let _ = self.sender.send(notification);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(Notification::new(NotificationLevel::Success, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(Notification::new(NotificationLevel::Error, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.publish(Notification::new(NotificationLevel::Info, message));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
