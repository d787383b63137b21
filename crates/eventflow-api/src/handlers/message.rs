//! Direct message handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use eventflow_core::types::MessageId;
use eventflow_entity::message::{Message, ThreadView};

use crate::dto::request::SendMessageRequest;
use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, LimitParams, ValidatedJson};
use crate::state::AppState;

/// POST /api/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), ApiError> {
    let message = state.message_service.send(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}

/// GET /api/messages
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<LimitParams>,
) -> Result<Json<ApiResponse<Vec<Message>>>, ApiError> {
    let items = state
        .message_service
        .list_for_user(&auth, params.limit)
        .await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/messages/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.message_service.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/messages/{id}/thread
pub async fn get_thread(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<MessageId>,
) -> Result<Json<ApiResponse<ThreadView>>, ApiError> {
    let thread = state.message_service.thread(&auth, id).await?;
    Ok(Json(ApiResponse::ok(thread)))
}

/// PUT /api/messages/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<MessageId>,
) -> Result<Json<ApiResponse<Message>>, ApiError> {
    let message = state.message_service.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(message)))
}
