//! List limit query parameter.

use serde::{Deserialize, Serialize};

/// `?limit=` for inbox listings. Out-of-range values are clamped by the
/// service.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LimitParams {
    /// Requested row count.
    pub limit: Option<u32>,
}
