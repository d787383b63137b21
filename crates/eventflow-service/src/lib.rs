//! # eventflow-service
//!
//! Business logic service layer for EventFlow. Each service implements one
//! collaborator-facing use case on top of the storage traits in
//! `eventflow-database`.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references or the [`Storage`] handle.
//!
//! [`Storage`]: eventflow_database::Storage

pub mod access;
pub mod audit;
pub mod change_request;
pub mod context;
pub mod message;
pub mod notification;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use access::AccessGuard;
pub use audit::AuditService;
pub use change_request::ChangeRequestService;
pub use context::RequestContext;
pub use message::{MessageService, SendMessage, ThreadResolver};
pub use notification::{NotificationRules, NotificationService};
pub use workflow::{WorkflowAction, WorkflowOrchestrator};
