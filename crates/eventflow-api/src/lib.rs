//! # eventflow-api
//!
//! HTTP API layer for EventFlow built on Axum.
//!
//! Exposes the approval workflow, audit trail, notification inbox and
//! messaging operations under `/api`, with identity extraction, request
//! validation, CORS, request logging and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
