//! Route definitions for the EventFlow HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(workflow_routes())
        .merge(notification_routes())
        .merge(message_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Status transitions, change requests, and audit history.
fn workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/events/{id}/submit", post(handlers::workflow::submit))
        .route("/events/{id}/approve", post(handlers::workflow::approve))
        .route("/events/{id}/reject", post(handlers::workflow::reject))
        .route("/events/{id}/cancel", post(handlers::workflow::cancel))
        .route(
            "/events/{id}/change-requests",
            post(handlers::workflow::request_change),
        )
        .route(
            "/events/{id}/audit-trail",
            get(handlers::audit::get_audit_trail),
        )
}

/// Notification inbox.
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}

/// Direct messages and threads.
fn message_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/messages",
            get(handlers::message::list_messages).post(handlers::message::send_message),
        )
        .route("/messages/unread-count", get(handlers::message::unread_count))
        .route("/messages/{id}/thread", get(handlers::message::get_thread))
        .route("/messages/{id}/read", put(handlers::message::mark_read))
}

/// Liveness.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
