//! The transition table and who may drive each transition.

use serde::{Deserialize, Serialize};

use eventflow_core::error::AppError;
use eventflow_core::result::AppResult;
use eventflow_core::types::UserId;
use eventflow_entity::audit::AuditAction;
use eventflow_entity::event::{EventRecord, EventStatus};
use eventflow_entity::user::ActorRole;

/// A status-changing workflow action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    /// Organiser sends a draft for review.
    Submit,
    /// Admin publishes an event under review.
    Approve,
    /// Admin declines an event under review.
    Reject,
    /// Owner or admin calls off a published event.
    Cancel,
}

impl WorkflowAction {
    /// Verb used in user-facing messages.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        }
    }

    /// The audit action recorded when this transition commits.
    pub fn audit_action(&self) -> AuditAction {
        match self {
            Self::Submit => AuditAction::SubmittedForApproval,
            Self::Approve => AuditAction::Published,
            Self::Reject => AuditAction::Rejected,
            Self::Cancel => AuditAction::Cancelled,
        }
    }

    /// The only status this action may start from.
    pub fn required_status(&self) -> EventStatus {
        match self {
            Self::Submit => EventStatus::Draft,
            Self::Approve | Self::Reject => EventStatus::PendingApproval,
            Self::Cancel => EventStatus::Published,
        }
    }

    /// Check the actor's right to perform this action on `event`.
    ///
    /// Returns the role recorded on the audit entry. `is_admin` must come
    /// from a fresh membership check.
    pub fn authorize(
        &self,
        event: &EventRecord,
        actor_id: UserId,
        is_admin: bool,
    ) -> AppResult<ActorRole> {
        match self {
            Self::Submit if event.is_owned_by(actor_id) => Ok(ActorRole::Organiser),
            Self::Submit => Err(AppError::forbidden(
                "only the organiser who owns this event can submit it for approval",
            )),
            Self::Approve | Self::Reject if is_admin => Ok(ActorRole::Admin),
            Self::Approve | Self::Reject => Err(AppError::forbidden(format!(
                "only an admin can {} events",
                self.verb()
            ))),
            Self::Cancel if is_admin => Ok(ActorRole::Admin),
            Self::Cancel if event.is_owned_by(actor_id) => Ok(ActorRole::Organiser),
            Self::Cancel => Err(AppError::forbidden(
                "only the organiser who owns this event or an admin can cancel it",
            )),
        }
    }

    /// Apply the transition table to `current`.
    pub fn apply(&self, current: EventStatus) -> AppResult<EventStatus> {
        next_status(current, *self).ok_or_else(|| {
            AppError::invalid_transition(format!(
                "event must be {} to {} (current status: {})",
                self.required_status().describe(),
                self.verb(),
                current
            ))
        })
    }
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// The legal transitions. Everything not listed is rejected.
pub fn next_status(current: EventStatus, action: WorkflowAction) -> Option<EventStatus> {
    use EventStatus::*;
    use WorkflowAction::*;

    match (current, action) {
        (Draft, Submit) => Some(PendingApproval),
        (PendingApproval, Approve) => Some(Published),
        (PendingApproval, Reject) => Some(Rejected),
        (Published, Cancel) => Some(Cancelled),
        (Draft | PendingApproval | Published | Cancelled | Rejected, _) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use eventflow_core::error::ErrorKind;
    use eventflow_core::types::EventId;

    const ALL_STATUSES: [EventStatus; 5] = [
        EventStatus::Draft,
        EventStatus::PendingApproval,
        EventStatus::Published,
        EventStatus::Cancelled,
        EventStatus::Rejected,
    ];
    const ALL_ACTIONS: [WorkflowAction; 4] = [
        WorkflowAction::Submit,
        WorkflowAction::Approve,
        WorkflowAction::Reject,
        WorkflowAction::Cancel,
    ];

    fn event_owned_by(organiser_id: UserId) -> EventRecord {
        EventRecord {
            id: EventId::new(),
            organiser_id,
            name: "Trail 50K".to_string(),
            status: EventStatus::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_the_required_status_transitions() {
        for action in ALL_ACTIONS {
            for status in ALL_STATUSES {
                let legal = next_status(status, action).is_some();
                assert_eq!(legal, status == action.required_status(), "{action} from {status}");
            }
        }
    }

    #[test]
    fn test_target_matches_audit_action() {
        for action in ALL_ACTIONS {
            let target = next_status(action.required_status(), action);
            assert_eq!(target, action.audit_action().resulting_status());
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        for status in ALL_STATUSES.into_iter().filter(EventStatus::is_terminal) {
            for action in ALL_ACTIONS {
                assert!(next_status(status, action).is_none());
            }
        }
    }

    #[test]
    fn test_invalid_transition_message_is_actionable() {
        let err = WorkflowAction::Approve.apply(EventStatus::Draft).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTransition);
        assert_eq!(
            err.message,
            "event must be pending approval to approve (current status: draft)"
        );
    }

    #[test]
    fn test_authorize_roles() {
        let owner = UserId::new();
        let stranger = UserId::new();
        let event = event_owned_by(owner);

        assert_eq!(
            WorkflowAction::Submit.authorize(&event, owner, false).unwrap(),
            ActorRole::Organiser
        );
        assert_eq!(
            WorkflowAction::Submit
                .authorize(&event, stranger, true)
                .unwrap_err()
                .kind,
            ErrorKind::Forbidden
        );
        assert_eq!(
            WorkflowAction::Approve
                .authorize(&event, owner, false)
                .unwrap_err()
                .kind,
            ErrorKind::Forbidden
        );
        assert_eq!(
            WorkflowAction::Cancel.authorize(&event, owner, false).unwrap(),
            ActorRole::Organiser
        );
        assert_eq!(
            WorkflowAction::Cancel.authorize(&event, stranger, true).unwrap(),
            ActorRole::Admin
        );
        assert!(WorkflowAction::Cancel.authorize(&event, stranger, false).is_err());
    }
}
