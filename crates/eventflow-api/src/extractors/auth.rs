//! `AuthUser` extractor: resolves the caller forwarded by the identity
//! provider and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use eventflow_core::error::AppError;
use eventflow_core::types::UserId;
use eventflow_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the authenticated user's ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthenticated("Missing x-user-id header"))?;

        let user_id: UserId = raw
            .trim()
            .parse()
            .map_err(|_| AppError::unauthenticated("Invalid x-user-id header"))?;

        let ctx = state.access.authenticate(user_id).await?;
        Ok(AuthUser(ctx))
    }
}
