//! Convenience result type alias for EventFlow.

use crate::error::AppError;

/// A specialized `Result` type for EventFlow operations.
pub type AppResult<T> = Result<T, AppError>;
