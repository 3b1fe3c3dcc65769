//! Error Manager
//! Centralizes error handling and notification dispatch

use crate::error::{ErrorSeverity, SnoError};
use crate::notification::NotificationManager;

/// Manages errors and their presentation to the user
pub struct ErrorManager {
    /// Internal notification manager for displaying errors
    notifications: NotificationManager,
}

impl ErrorManager {
    /// Create a new error manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            notifications: NotificationManager::new(),
        }
    }

    pub fn handle(&mut self, err: SnoError) {
        match err.severity {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                tracing::error!(kind = %err.kind, code = %err.code, "{}", err.message);
                self.notifications.error(err.message);
            }
            ErrorSeverity::Warning => {
                tracing::warn!(kind = %err.kind, code = %err.code, "{}", err.message);
                self.notifications.warn(err.message);
            }
            ErrorSeverity::Info => {
                tracing::info!(kind = %err.kind, code = %err.code, "{}", err.message);
                self.notifications.info(err.message);
            }
        }
    }

    /// Get a reference to the notification manager
    #[must_use]
    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    /// Get a mutable reference to the notification manager
    pub fn notifications_mut(&mut self) -> &mut NotificationManager {
        &mut self.notifications
    }
}

impl Default for ErrorManager {
    fn default() -> Self {
        Self::new()
    }
}
