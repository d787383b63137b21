//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use eventflow_core::types::{NotificationId, UserId};

/// A short, typed alert in a user's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient.
    pub user_id: UserId,
    /// Free-form type tag (see [`super::kind`]).
    #[serde(rename = "type")]
    pub notification_type: String,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Where the alert points to, if anywhere.
    pub link: Option<String>,
    /// Additional structured data.
    pub metadata: Option<serde_json::Value>,
    /// When the user read it. `None` means unread.
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}

/// Data required to create a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// The recipient.
    pub user_id: UserId,
    /// Free-form type tag.
    pub notification_type: String,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Optional link.
    pub link: Option<String>,
    /// Optional structured data.
    pub metadata: Option<serde_json::Value>,
}
