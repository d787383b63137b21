//! Custom Axum extractors.

pub mod auth;
pub mod limit;
pub mod validated;

pub use auth::{AuthUser, USER_ID_HEADER};
pub use limit::LimitParams;
pub use validated::ValidatedJson;
