//! Identity and admin-membership checks against the user directory.

use std::sync::Arc;

use tracing::warn;

use eventflow_core::error::AppError;
use eventflow_core::result::AppResult;
use eventflow_core::types::UserId;
use eventflow_database::UserDirectory;

use crate::context::RequestContext;

/// Resolves callers and answers role questions.
#[derive(Clone)]
pub struct AccessGuard {
    /// Read-only view of the identity provider.
    users: Arc<dyn UserDirectory>,
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard").finish_non_exhaustive()
    }
}

impl AccessGuard {
    /// Creates a new access guard.
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Builds the request context for a caller.
    ///
    /// Unknown and deactivated users are `Unauthenticated`. Storage failures
    /// propagate so the caller can retry.
    pub async fn authenticate(&self, user_id: UserId) -> AppResult<RequestContext> {
        let user = self
            .users
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Unknown user"))?;

        if !user.is_active {
            return Err(AppError::unauthenticated("User account is deactivated"));
        }

        Ok(RequestContext::from_user(user))
    }

    /// Whether `user_id` is an active admin.
    ///
    /// Any lookup failure answers `false`.
    pub async fn is_admin(&self, user_id: UserId) -> bool {
        match self.users.find_user(user_id).await {
            Ok(Some(user)) => user.is_active && user.role.is_admin(),
            Ok(None) => false,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Admin check failed, denying");
                false
            }
        }
    }

    /// Fails with `Forbidden` unless `ctx` is an active admin.
    pub async fn require_admin(&self, ctx: &RequestContext, action: &str) -> AppResult<()> {
        if self.is_admin(ctx.user_id).await {
            Ok(())
        } else {
            Err(AppError::forbidden(format!("only an admin can {action}")))
        }
    }
}
