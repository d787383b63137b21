//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventflow_core::types::UserId;
use eventflow_entity::user::{ActorRole, UserSummary};

/// Context for the current authenticated request.
///
/// Built by the API layer from the identity provider's user record and
/// passed into service methods so that every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's role as reported by the identity provider.
    pub role: ActorRole,
    /// Display name (convenience field for notification text).
    pub display_name: String,
    /// Email address.
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: ActorRole, display_name: String, email: String) -> Self {
        Self {
            user_id,
            role,
            display_name,
            email,
            request_time: Utc::now(),
        }
    }

    /// Creates a context for a user record read from the directory.
    pub fn from_user(user: UserSummary) -> Self {
        Self::new(user.id, user.role, user.display_name, user.email)
    }

    /// Returns whether the current user claims the admin role.
    ///
    /// Authorization decisions go through [`crate::AccessGuard`], which
    /// re-reads membership.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
