//! User-facing notification channel.
//!
//! Notifications are fire-and-forget: each one is broadcast to subscribers and
//! becomes the single "current" notification until it expires or a newer one
//! replaces it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{error, info};

const BUFFER_CAPACITY: usize = 64;

/// How long a notification stays visible.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Monotonic per notifier.
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

struct Current {
    notification: Notification,
    raised_at: Instant,
}

struct NotifierInner {
    sender: broadcast::Sender<Notification>,
    current: Mutex<Option<Current>>,
    next_id: AtomicU64,
    ttl: Duration,
}

/// Cloneable handle to one notification channel.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("ttl", &self.inner.ttl)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        let (sender, _receiver) = broadcast::channel(BUFFER_CAPACITY);
        Self {
            inner: Arc::new(NotifierInner {
                sender,
                current: Mutex::new(None),
                next_id: AtomicU64::new(1),
                ttl,
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Raise a notification. Never fails and never blocks.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> Notification {
        let notification = Notification {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            severity,
        };

        match severity {
            Severity::Error => error!(message = %notification.message, "notification"),
            Severity::Success | Severity::Info => {
                info!(message = %notification.message, severity = ?severity, "notification")
            }
        }

        *self.inner.current.lock() = Some(Current {
            notification: notification.clone(),
            raised_at: Instant::now(),
        });
        // No subscribers is fine.
        let _ = self.inner.sender.send(notification.clone());
        notification
    }

    pub fn success(&self, message: impl Into<String>) -> Notification {
        self.notify(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Notification {
        self.notify(message, Severity::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> Notification {
        self.notify(message, Severity::Info)
    }

    /// The visible notification, if it has not expired yet.
    pub fn current(&self) -> Option<Notification> {
        let mut current = self.inner.current.lock();
        let expired = current
            .as_ref()
            .is_some_and(|entry| entry.raised_at.elapsed() >= self.inner.ttl);
        if expired {
            *current = None;
        }
        current.as_ref().map(|entry| entry.notification.clone())
    }

    pub fn dismiss(&self) {
        *self.inner.current.lock() = None;
    }

    /// Receive every notification raised after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.inner.sender.subscribe()
    }
}
