//! Notification sink
//!
//! Fire-and-forget user notifications. Titles follow the checklist UI's
//! existing wording.

use serde::{Deserialize, Serialize};

/// Title of the success notification
pub const SUCCESS_TITLE: &str = "Success";
/// Message of the success notification
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";
/// Refresh failed
pub const LOAD_ERROR_TITLE: &str = "Error loading documents";
/// Raw intake failed
pub const UPLOAD_ERROR_TITLE: &str = "Error uploading file";
/// Rename or new version failed
pub const RENAME_ERROR_TITLE: &str = "Error renaming file";
/// Status update failed
pub const STATUS_ERROR_TITLE: &str = "Error updating document status";
/// Upload rejected before reaching the store
pub const INVALID_UPLOAD_TITLE: &str = "Invalid upload";
/// Requirement gate lookup failed
pub const REQUIREMENT_ERROR_TITLE: &str = "Error fetching checklist requirement";

/// Notification variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
}

/// User-facing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Variant
    pub kind: NotificationKind,
    /// Short title
    pub title: String,
    /// Detail
    pub message: String,
}

impl Notification {
    /// Success notification
    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Error notification
    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Standard upload success
    #[must_use]
    pub fn upload_succeeded() -> Self {
        Self::success(SUCCESS_TITLE, UPLOAD_SUCCESS_MESSAGE)
    }
}

/// Receiver of user notifications
pub trait NotificationSink: Send + Sync {
    /// Deliver a notification; nothing is returned to the engine
    fn notify(&self, notification: Notification);
}

/// Sink that only writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                tracing::info!(title = %notification.title, "{}", notification.message);
            }
            NotificationKind::Error => {
                tracing::warn!(title = %notification.title, "{}", notification.message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_success_wording() {
        let n = Notification::upload_succeeded();
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.title, "Success");
        assert_eq!(n.message, "File uploaded successfully");
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&NotificationKind::Error).unwrap();
        assert_eq!(json, "\"error\"");
    }
}
