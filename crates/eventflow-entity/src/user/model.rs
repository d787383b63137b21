//! User summary model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use eventflow_core::types::UserId;

use super::role::ActorRole;

/// Read-only view of a user as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub display_name: String,
    /// Contact email.
    pub email: String,
    /// Workflow role.
    pub role: ActorRole,
    /// Whether the account may act and receive notifications.
    pub is_active: bool,
}
