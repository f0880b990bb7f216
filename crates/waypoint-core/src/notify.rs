//! Notification delivery.
//!
//! The engine produces [`Notification`] values; the tracker hands them to a
//! [`Notifier`] once the change that produced them has been committed.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// A message emitted by a workflow transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient identity (admin role, step assignee or process creator)
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Delivery channel for notifications.
///
/// Implementations must not fail the operation that produced the
/// notification; delivery problems are theirs to log.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Writes every notification to the log at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        log::info!(
            "notify {}: {} ({})",
            notification.recipient,
            notification.subject,
            notification.body
        );
    }
}

/// Keeps every notification in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything delivered so far.
    pub fn sent(&self) -> Vec<Notification> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Removes and returns everything delivered so far.
    pub fn take(&self) -> Vec<Notification> {
        match self.sent.lock() {
            Ok(mut sent) => std::mem::take(&mut *sent),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: &Notification) {
        match self.sent.lock() {
            Ok(mut sent) => sent.push(notification.clone()),
            Err(poisoned) => poisoned.into_inner().push(notification.clone()),
        }
    }
}
