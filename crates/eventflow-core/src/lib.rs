//! # eventflow-core
//!
//! Core crate for EventFlow. Contains configuration schemas, typed
//! identifiers, list limits, and the unified error system.
//!
//! This crate has **no** internal dependencies on other EventFlow crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
