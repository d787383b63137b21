//! Event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use eventflow_core::types::{EventId, UserId};

use super::status::EventStatus;

/// The slice of an event row the workflow reads.
///
/// The event CRUD layer owns the full record; this core only reads these
/// columns and writes `status`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRecord {
    /// Event identifier.
    pub id: EventId,
    /// The organiser who owns the event.
    pub organiser_id: UserId,
    /// Display name of the event.
    pub name: String,
    /// Current lifecycle status.
    pub status: EventStatus,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
    /// When the event was last modified.
    pub updated_at: DateTime<Utc>,
}

impl EventRecord {
    /// Whether `user_id` is the owning organiser.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.organiser_id == user_id
    }
}
