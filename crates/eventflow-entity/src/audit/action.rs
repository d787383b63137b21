//! Audit action enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::event::EventStatus;

/// The kind of action recorded in an event's audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// The event was created as a draft.
    Created,
    /// The organiser submitted the event for review.
    SubmittedForApproval,
    /// The organiser asked for edits while the event is under review.
    ChangeRequested,
    /// An admin edited the event's details.
    AdminUpdated,
    /// An admin approved the event.
    Published,
    /// The event was cancelled after publication.
    Cancelled,
    /// An admin declined the event.
    Rejected,
}

impl AuditAction {
    /// The event status this action leaves behind, if it changes status at all.
    ///
    /// `change_requested` and `admin_updated` never alter status.
    pub fn resulting_status(&self) -> Option<EventStatus> {
        match self {
            Self::Created => Some(EventStatus::Draft),
            Self::SubmittedForApproval => Some(EventStatus::PendingApproval),
            Self::Published => Some(EventStatus::Published),
            Self::Cancelled => Some(EventStatus::Cancelled),
            Self::Rejected => Some(EventStatus::Rejected),
            Self::ChangeRequested | Self::AdminUpdated => None,
        }
    }

    /// Whether this action records a status change.
    pub fn changes_status(&self) -> bool {
        self.resulting_status().is_some()
    }

    /// Return the action as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::SubmittedForApproval => "submitted_for_approval",
            Self::ChangeRequested => "change_requested",
            Self::AdminUpdated => "admin_updated",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_channel_actions_keep_status() {
        assert_eq!(AuditAction::ChangeRequested.resulting_status(), None);
        assert_eq!(AuditAction::AdminUpdated.resulting_status(), None);
        assert!(!AuditAction::ChangeRequested.changes_status());
    }

    #[test]
    fn test_status_changing_actions() {
        assert_eq!(
            AuditAction::SubmittedForApproval.resulting_status(),
            Some(EventStatus::PendingApproval)
        );
        assert_eq!(
            AuditAction::Published.resulting_status(),
            Some(EventStatus::Published)
        );
        assert_eq!(
            serde_json::to_string(&AuditAction::SubmittedForApproval).unwrap(),
            "\"submitted_for_approval\""
        );
    }
}
