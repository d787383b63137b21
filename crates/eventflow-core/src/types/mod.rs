//! Core type definitions used across the EventFlow workspace.

pub mod id;
pub mod limit;

pub use id::*;
pub use limit::ListLimit;
