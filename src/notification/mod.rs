//! Notification system
//! Messages shown in the message bar, with optional expiry

use crate::error::ErrorSeverity;
use std::fmt;
use std::time::{Duration, Instant};

/// Types of notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    /// Informational message
    Info,
    /// Warning message
    Warning,
    /// Error message
    Error,
    /// Success message
    Success,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Success => write!(f, "OK"),
        }
    }
}

impl From<ErrorSeverity> for NotificationType {
    fn from(severity: ErrorSeverity) -> Self {
        match severity {
            ErrorSeverity::Info => NotificationType::Info,
            ErrorSeverity::Warning => NotificationType::Warning,
            ErrorSeverity::Error | ErrorSeverity::Critical => NotificationType::Error,
        }
    }
}

/// A single notification
#[derive(Debug, Clone)]
pub struct Notification {
    /// Unique identifier, increasing in creation order
    pub id: u64,
    /// The message content
    pub message: String,
    /// The type/severity of the notification
    pub kind: NotificationType,
    /// When the notification was created
    pub timestamp: Instant,
    /// Optional time-to-live. If None, it persists until manually dismissed.
    pub ttl: Option<Duration>,
}

impl Notification {
    pub fn new(
        id: u64,
        kind: NotificationType,
        message: impl Into<String>,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            id,
            message: message.into(),
            kind,
            timestamp: Instant::now(),
            ttl,
        }
    }

    /// Check if the notification has expired
    pub fn is_expired(&self, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.duration_since(self.timestamp) > ttl)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Manages active notifications
pub struct NotificationManager {
    notifications: Vec<Notification>,
    next_id: u64,
    /// Monotonic generation counter for change detection
    pub generation: u64,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: Vec::new(),
            next_id: 0,
            generation: 0,
        }
    }

    /// Add a notification
    pub fn add(
        &mut self,
        kind: NotificationType,
        message: impl Into<String>,
        ttl: Option<Duration>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notifications
            .push(Notification::new(id, kind, message, ttl));
        self.generation += 1;
        id
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.add(
            NotificationType::Info,
            message,
            Some(Duration::from_secs(5)),
        )
    }

    pub fn warn(&mut self, message: impl Into<String>) -> u64 {
        self.add(
            NotificationType::Warning,
            message,
            Some(Duration::from_secs(8)),
        )
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.add(
            NotificationType::Error,
            message,
            Some(Duration::from_secs(10)),
        )
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.add(
            NotificationType::Success,
            message,
            Some(Duration::from_secs(3)),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn iter_active(&self) -> std::slice::Iter<'_, Notification> {
        self.notifications.iter()
    }

    /// Notifications created at or after `id`, in creation order
    pub fn since(&self, id: u64) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(move |n| n.id >= id)
    }

    /// Id the next notification will receive
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// The most recent notification, if any
    pub fn last(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Prune expired notifications
    pub fn prune_expired(&mut self) {
        let now = Instant::now();
        let old_len = self.notifications.len();
        self.notifications.retain(|n| !n.is_expired(now));
        if self.notifications.len() != old_len {
            self.generation += 1;
        }
    }

    /// Remove a notification by ID
    pub fn remove(&mut self, id: u64) {
        if let Some(pos) = self.notifications.iter().position(|n| n.id == id) {
            self.notifications.remove(pos);
            self.generation += 1;
        }
    }

    /// Clear all notifications
    pub fn clear_all(&mut self) {
        if !self.notifications.is_empty() {
            self.notifications.clear();
            self.generation += 1;
        }
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
