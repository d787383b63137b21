//! Organiser change requests on events under review.
//!
//! A change request is logged and routed to the admin role, but it is not a
//! status transition: the event stays `pending_approval`.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use eventflow_core::error::AppError;
use eventflow_core::result::AppResult;
use eventflow_core::types::EventId;
use eventflow_database::WorkflowStore;
use eventflow_entity::audit::{AuditAction, AuditTrailEntry, NewAuditEntry};
use eventflow_entity::event::{EventRecord, EventStatus};
use eventflow_entity::user::ActorRole;
use eventflow_entity::workflow::WorkflowCommit;

use crate::context::RequestContext;
use crate::notification::NotificationRules;

/// Upper bound on request text, in characters.
const MAX_REQUEST_LENGTH: usize = 4000;

/// Handles change requests.
#[derive(Clone)]
pub struct ChangeRequestService {
    /// Transactional workflow storage.
    store: Arc<dyn WorkflowStore>,
    /// Notification recipients and wording.
    rules: NotificationRules,
}

impl std::fmt::Debug for ChangeRequestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeRequestService")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl ChangeRequestService {
    /// Creates a new change request service.
    pub fn new(store: Arc<dyn WorkflowStore>, rules: NotificationRules) -> Self {
        Self { store, rules }
    }

    /// Log a change request from the owning organiser and notify the admin
    /// role. The event must be pending approval.
    pub async fn request_change(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
        text: &str,
    ) -> AppResult<AuditTrailEntry> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("change request text is required"));
        }
        if text.chars().count() > MAX_REQUEST_LENGTH {
            return Err(AppError::validation(format!(
                "change request text must be at most {MAX_REQUEST_LENGTH} characters"
            )));
        }

        let organiser_id = ctx.user_id;
        let decide = |event: &EventRecord| -> AppResult<WorkflowCommit> {
            if !event.is_owned_by(organiser_id) {
                return Err(AppError::forbidden(
                    "only the organiser who owns this event can request changes",
                ));
            }
            if event.status != EventStatus::PendingApproval {
                return Err(AppError::invalid_transition(format!(
                    "event must be pending approval to request changes (current status: {})",
                    event.status
                )));
            }
            Ok(WorkflowCommit {
                new_status: None,
                audit: NewAuditEntry {
                    event_id: event.id,
                    action_type: AuditAction::ChangeRequested,
                    performed_by: organiser_id,
                    performed_by_role: ActorRole::Organiser,
                    message: text.to_string(),
                    metadata: Some(json!({ "requested_by": ctx.display_name })),
                },
                notification: Some(self.rules.change_requested(event, text)),
            })
        };

        let receipt = self
            .store
            .commit(event_id, &decide)
            .await
            .inspect_err(|e| {
                warn!(
                    event_id = %event_id,
                    actor_id = %organiser_id,
                    error = %e,
                    "Change request rejected"
                );
            })?;

        info!(
            event_id = %event_id,
            action = %AuditAction::ChangeRequested,
            actor_id = %organiser_id,
            recipients = receipt.notifications.len(),
            "Change request logged"
        );
        Ok(receipt.audit_entry)
    }
}
