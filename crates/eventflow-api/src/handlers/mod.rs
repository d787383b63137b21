//! HTTP request handlers.

pub mod audit;
pub mod health;
pub mod message;
pub mod notification;
pub mod workflow;
