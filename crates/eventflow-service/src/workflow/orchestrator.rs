//! Workflow orchestrator: validates status transitions and commits them
//! together with their audit entry and notifications.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use eventflow_core::error::{AppError, ErrorKind};
use eventflow_core::result::AppResult;
use eventflow_core::types::EventId;
use eventflow_database::WorkflowStore;
use eventflow_entity::audit::{AuditAction, AuditTrailEntry, NewAuditEntry};
use eventflow_entity::event::{EventRecord, EventStatus};
use eventflow_entity::user::ActorRole;
use eventflow_entity::workflow::{WorkflowCommit, WorkflowReceipt};

use super::transitions::WorkflowAction;
use crate::access::AccessGuard;
use crate::context::RequestContext;
use crate::notification::NotificationRules;

/// The only component that changes an event's status.
#[derive(Clone)]
pub struct WorkflowOrchestrator {
    /// Transactional workflow storage.
    store: Arc<dyn WorkflowStore>,
    /// Admin membership checks.
    access: AccessGuard,
    /// Notification recipients and wording.
    rules: NotificationRules,
}

impl std::fmt::Debug for WorkflowOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowOrchestrator")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl WorkflowOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        store: Arc<dyn WorkflowStore>,
        access: AccessGuard,
        rules: NotificationRules,
    ) -> Self {
        Self {
            store,
            access,
            rules,
        }
    }

    /// `draft -> pending_approval`, by the owning organiser. Notifies the
    /// admin role.
    pub async fn submit_for_approval(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
    ) -> AppResult<WorkflowReceipt> {
        self.transition(ctx, event_id, WorkflowAction::Submit, None)
            .await
    }

    /// `pending_approval -> published`, by an admin. Notifies the organiser.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
    ) -> AppResult<WorkflowReceipt> {
        self.transition(ctx, event_id, WorkflowAction::Approve, None)
            .await
    }

    /// `pending_approval -> rejected`, by an admin, with a mandatory reason.
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
        reason: &str,
    ) -> AppResult<WorkflowReceipt> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation("a rejection reason is required"));
        }
        self.transition(ctx, event_id, WorkflowAction::Reject, Some(reason))
            .await
    }

    /// `published -> cancelled`, by the owning organiser or an admin.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
    ) -> AppResult<WorkflowReceipt> {
        self.transition(ctx, event_id, WorkflowAction::Cancel, None)
            .await
    }

    /// Record that the owning organiser created a draft. No status change and
    /// no notification.
    pub async fn record_created(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
    ) -> AppResult<AuditTrailEntry> {
        let actor_id = ctx.user_id;
        let decide = |event: &EventRecord| -> AppResult<WorkflowCommit> {
            if !event.is_owned_by(actor_id) {
                return Err(AppError::forbidden(
                    "only the organiser who owns this event can record its creation",
                ));
            }
            if event.status != EventStatus::Draft {
                return Err(AppError::invalid_transition(format!(
                    "event must be a draft to record its creation (current status: {})",
                    event.status
                )));
            }
            Ok(WorkflowCommit {
                new_status: None,
                audit: NewAuditEntry {
                    event_id: event.id,
                    action_type: AuditAction::Created,
                    performed_by: actor_id,
                    performed_by_role: ActorRole::Organiser,
                    message: format!("Event \"{}\" created", event.name),
                    metadata: None,
                },
                notification: None,
            })
        };

        let receipt = self
            .store
            .commit(event_id, &decide)
            .await
            .inspect_err(|e| log_rejection(e, event_id, AuditAction::Created, ctx))?;

        info!(event_id = %event_id, actor_id = %actor_id, "Event creation recorded");
        Ok(receipt.audit_entry)
    }

    /// Record an admin edit made through the CRUD layer. The organiser is
    /// notified; status is untouched.
    pub async fn record_admin_update(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
        summary: &str,
        metadata: Option<serde_json::Value>,
    ) -> AppResult<WorkflowReceipt> {
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(AppError::validation("an update summary is required"));
        }
        self.access.require_admin(ctx, "update events").await?;

        let actor_id = ctx.user_id;
        let decide = |event: &EventRecord| -> AppResult<WorkflowCommit> {
            Ok(WorkflowCommit {
                new_status: None,
                audit: NewAuditEntry {
                    event_id: event.id,
                    action_type: AuditAction::AdminUpdated,
                    performed_by: actor_id,
                    performed_by_role: ActorRole::Admin,
                    message: summary.to_string(),
                    metadata: metadata.clone(),
                },
                notification: Some(self.rules.admin_updated(event, summary)),
            })
        };

        let receipt = self
            .store
            .commit(event_id, &decide)
            .await
            .inspect_err(|e| log_rejection(e, event_id, AuditAction::AdminUpdated, ctx))?;

        info!(
            event_id = %event_id,
            actor_id = %actor_id,
            recipients = receipt.notifications.len(),
            "Admin update recorded"
        );
        Ok(receipt)
    }

    async fn transition(
        &self,
        ctx: &RequestContext,
        event_id: EventId,
        action: WorkflowAction,
        reason: Option<&str>,
    ) -> AppResult<WorkflowReceipt> {
        let actor_id = ctx.user_id;
        let is_admin = match action {
            WorkflowAction::Submit => false,
            _ => self.access.is_admin(actor_id).await,
        };

        let decide = |event: &EventRecord| -> AppResult<WorkflowCommit> {
            let role = action.authorize(event, actor_id, is_admin)?;
            let next = action.apply(event.status)?;

            let notification = match action {
                WorkflowAction::Submit => self.rules.submitted(event, &ctx.display_name),
                WorkflowAction::Approve => self.rules.published(event),
                WorkflowAction::Reject => self.rules.rejected(event, reason.unwrap_or_default()),
                WorkflowAction::Cancel => self.rules.cancelled(event, role.is_admin()),
            };
            let message = match reason {
                Some(reason) => reason.to_string(),
                None => format!(
                    "{} {} \"{}\"",
                    ctx.display_name,
                    past_tense(action),
                    event.name
                ),
            };

            Ok(WorkflowCommit {
                new_status: Some(next),
                audit: NewAuditEntry {
                    event_id: event.id,
                    action_type: action.audit_action(),
                    performed_by: actor_id,
                    performed_by_role: role,
                    message,
                    metadata: reason.map(|r| json!({ "reason": r })),
                },
                notification: Some(notification),
            })
        };

        let receipt = self
            .store
            .commit(event_id, &decide)
            .await
            .inspect_err(|e| log_rejection(e, event_id, action.audit_action(), ctx))?;

        info!(
            event_id = %event_id,
            action = %receipt.audit_entry.action_type,
            actor_id = %actor_id,
            from = %receipt.previous_status,
            to = %receipt.event.status,
            recipients = receipt.notifications.len(),
            "Event status transition committed"
        );
        Ok(receipt)
    }
}

fn past_tense(action: WorkflowAction) -> &'static str {
    match action {
        WorkflowAction::Submit => "submitted for approval",
        WorkflowAction::Approve => "approved",
        WorkflowAction::Reject => "rejected",
        WorkflowAction::Cancel => "cancelled",
    }
}

fn log_rejection(err: &AppError, event_id: EventId, action: AuditAction, ctx: &RequestContext) {
    match err.kind {
        ErrorKind::InvalidTransition | ErrorKind::Forbidden | ErrorKind::NotFound => {
            warn!(
                event_id = %event_id,
                action = %action,
                actor_id = %ctx.user_id,
                reason = %err.message,
                "Workflow action rejected"
            );
        }
        _ => {
            warn!(
                event_id = %event_id,
                action = %action,
                actor_id = %ctx.user_id,
                error = %err,
                "Workflow action failed; nothing was persisted"
            );
        }
    }
}
