//! Common types used across the frontend application.

use pixdrop::{Level, Notification};

// =============================================================================
// Toast Types
// =============================================================================

/// A transient message shown in the corner of the page.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    /// Unique per page load, used to dismiss it
    pub id: u64,
    pub level: Level,
    pub message: String,
}

impl Toast {
    pub fn new(id: u64, notification: Notification) -> Self {
        Self {
            id,
            level: notification.level,
            message: notification.message,
        }
    }

    /// CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self.level {
            Level::Warning => "toast toast-warning",
            Level::Error => "toast toast-error",
        }
    }

    /// Emoji prefix for display.
    pub fn emoji(&self) -> &'static str {
        match self.level {
            Level::Warning => "⚠️",
            Level::Error => "❌",
        }
    }
}
