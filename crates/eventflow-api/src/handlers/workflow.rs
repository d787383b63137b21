//! Event approval workflow handlers.

use axum::Json;
use axum::extract::{Path, State};

use eventflow_core::types::EventId;
use eventflow_entity::audit::AuditTrailEntry;

use crate::dto::request::{ChangeRequestBody, RejectRequest};
use crate::dto::response::{ApiResponse, WorkflowResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/events/{id}/submit
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<EventId>,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    let receipt = state
        .orchestrator
        .submit_for_approval(&auth, event_id)
        .await?;
    Ok(Json(ApiResponse::ok(receipt.into())))
}

/// POST /api/events/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<EventId>,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    let receipt = state.orchestrator.approve(&auth, event_id).await?;
    Ok(Json(ApiResponse::ok(receipt.into())))
}

/// POST /api/events/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<EventId>,
    ValidatedJson(req): ValidatedJson<RejectRequest>,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    let receipt = state
        .orchestrator
        .reject(&auth, event_id, &req.reason)
        .await?;
    Ok(Json(ApiResponse::ok(receipt.into())))
}

/// POST /api/events/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<EventId>,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    let receipt = state.orchestrator.cancel(&auth, event_id).await?;
    Ok(Json(ApiResponse::ok(receipt.into())))
}

/// POST /api/events/{id}/change-requests
pub async fn request_change(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<EventId>,
    ValidatedJson(req): ValidatedJson<ChangeRequestBody>,
) -> Result<Json<ApiResponse<AuditTrailEntry>>, ApiError> {
    let entry = state
        .change_requests
        .request_change(&auth, event_id, &req.text)
        .await?;
    Ok(Json(ApiResponse::ok(entry)))
}
