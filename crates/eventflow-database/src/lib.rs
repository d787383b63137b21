//! # eventflow-database
//!
//! Storage seams for the approval workflow and their two implementations:
//! PostgreSQL repositories (production) and an in-memory store (single
//! node, tests). Both honour the same atomicity contract.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{
    AuditStore, HealthCheck, MessageNotice, MessageSnapshot, MessageStore, NotificationStore,
    Storage, UserDirectory, WorkflowDecision, WorkflowStore,
};
