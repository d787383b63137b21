//! Bounded list sizes for inbox queries.

use serde::{Deserialize, Serialize};

/// Default number of rows returned by inbox listings.
pub const DEFAULT_LIST_LIMIT: u32 = 50;
/// Hard ceiling on rows returned by inbox listings.
pub const MAX_LIST_LIMIT: u32 = 200;

/// A validated row limit for list queries. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListLimit(u32);

impl ListLimit {
    /// Build a limit, clamping into `1..=max`.
    pub fn new(value: u32, max: u32) -> Self {
        Self(value.clamp(1, max.max(1)))
    }

    /// Resolve an optional caller-supplied limit against configured bounds.
    pub fn resolve(requested: Option<u32>, default: u32, max: u32) -> Self {
        Self::new(requested.unwrap_or(default), max)
    }

    /// The limit as an unsigned count.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// The limit as a SQL `LIMIT` bind value.
    pub fn as_i64(&self) -> i64 {
        i64::from(self.0)
    }

    /// The limit as a slice length.
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl Default for ListLimit {
    fn default() -> Self {
        Self(DEFAULT_LIST_LIMIT)
    }
}
