//! Audit trail handlers.

use axum::Json;
use axum::extract::{Path, State};

use eventflow_core::types::EventId;
use eventflow_entity::audit::AuditTrailView;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/events/{id}/audit-trail
pub async fn get_audit_trail(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(event_id): Path<EventId>,
) -> Result<Json<ApiResponse<Vec<AuditTrailView>>>, ApiError> {
    let trail = state.audit_service.get_audit_trail(event_id).await?;
    Ok(Json(ApiResponse::ok(trail)))
}
