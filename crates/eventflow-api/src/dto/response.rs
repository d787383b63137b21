//! Response DTOs.

use serde::{Deserialize, Serialize};

use eventflow_core::types::EventId;
use eventflow_entity::audit::AuditTrailEntry;
use eventflow_entity::event::EventStatus;
use eventflow_entity::workflow::WorkflowReceipt;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Result of a workflow operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResponse {
    /// The event acted on.
    pub event_id: EventId,
    /// Status after the operation.
    pub status: EventStatus,
    /// Status before the operation.
    pub previous_status: EventStatus,
    /// The audit entry written.
    pub audit_entry: AuditTrailEntry,
    /// Number of notifications created.
    pub notified: usize,
}

impl From<WorkflowReceipt> for WorkflowResponse {
    fn from(receipt: WorkflowReceipt) -> Self {
        Self {
            event_id: receipt.event.id,
            status: receipt.event.status,
            previous_status: receipt.previous_status,
            audit_entry: receipt.audit_entry,
            notified: receipt.notifications.len(),
        }
    }
}

/// Unread count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Number of unread items.
    pub count: i64,
}

/// Bulk mark-read result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedResponse {
    /// Number of rows updated.
    pub marked: usize,
}

/// Health check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// `"connected"` or `"unavailable"`.
    pub storage: String,
    /// Server version.
    pub version: String,
}
