//! The unit of work produced by a workflow decision.
//!
//! A decision is computed against the locked event row and then persisted
//! as one transaction: optional status write, one audit entry, and the
//! notifications derived from the draft's audience.

use serde::{Deserialize, Serialize};

use eventflow_core::types::UserId;

use crate::audit::{AuditTrailEntry, NewAuditEntry};
use crate::event::{EventRecord, EventStatus};
use crate::notification::{NewNotification, Notification};

/// Who receives a role-addressed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    /// Every active admin, resolved inside the transaction.
    ActiveAdmins,
    /// One specific user.
    User(UserId),
}

/// A notification whose recipients are not yet resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDraft {
    /// Recipient rule.
    pub audience: Audience,
    /// Free-form type tag.
    pub notification_type: String,
    /// Title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Optional link.
    pub link: Option<String>,
    /// Optional structured data.
    pub metadata: Option<serde_json::Value>,
}

impl NotificationDraft {
    /// Materialise the draft for one resolved recipient.
    pub fn addressed_to(&self, user_id: UserId) -> NewNotification {
        NewNotification {
            user_id,
            notification_type: self.notification_type.clone(),
            title: self.title.clone(),
            message: self.message.clone(),
            link: self.link.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Everything one workflow operation writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowCommit {
    /// New status, or `None` for side-channel entries.
    pub new_status: Option<EventStatus>,
    /// The audit entry to append.
    pub audit: NewAuditEntry,
    /// The notification to fan out, if any.
    pub notification: Option<NotificationDraft>,
}

/// What a committed workflow operation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowReceipt {
    /// The event after the commit.
    pub event: EventRecord,
    /// Status before the commit.
    pub previous_status: EventStatus,
    /// The appended audit entry.
    pub audit_entry: AuditTrailEntry,
    /// Notifications created, one per resolved recipient.
    pub notifications: Vec<Notification>,
}
