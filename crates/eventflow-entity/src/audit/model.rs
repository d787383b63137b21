//! Audit trail entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use eventflow_core::types::{AuditEntryId, EventId, UserId};

use super::action::AuditAction;
use crate::user::ActorRole;

/// An immutable record of an action taken against an event.
///
/// Rows are never updated or deleted once inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AuditTrailEntry {
    /// Unique entry identifier.
    pub id: AuditEntryId,
    /// The event acted upon.
    pub event_id: EventId,
    /// What happened.
    pub action_type: AuditAction,
    /// Who did it.
    pub performed_by: UserId,
    /// The role they acted in.
    pub performed_by_role: ActorRole,
    /// Free-text description (reason, change request text, ...).
    pub message: String,
    /// Optional structured details.
    pub metadata: Option<serde_json::Value>,
    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
}

/// Data required to append an audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEntry {
    /// The event acted upon.
    pub event_id: EventId,
    /// What happened.
    pub action_type: AuditAction,
    /// Who did it.
    pub performed_by: UserId,
    /// The role they acted in.
    pub performed_by_role: ActorRole,
    /// Free-text description.
    pub message: String,
    /// Optional structured details.
    pub metadata: Option<serde_json::Value>,
}

/// An audit entry decorated with the performer's display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AuditTrailView {
    /// The stored entry.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub entry: AuditTrailEntry,
    /// Performer display name, if the user is still known.
    pub performer_name: Option<String>,
    /// Performer email, if the user is still known.
    pub performer_email: Option<String>,
}
