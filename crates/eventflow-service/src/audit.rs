//! Read access to an event's audit trail.

use std::sync::Arc;

use eventflow_core::error::AppError;
use eventflow_core::result::AppResult;
use eventflow_core::types::EventId;
use eventflow_database::{AuditStore, WorkflowStore};
use eventflow_entity::audit::AuditTrailView;

/// Serves the chronological history of an event.
#[derive(Clone)]
pub struct AuditService {
    /// Audit storage.
    audit: Arc<dyn AuditStore>,
    /// Used to tell "no history" apart from "no such event".
    events: Arc<dyn WorkflowStore>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(audit: Arc<dyn AuditStore>, events: Arc<dyn WorkflowStore>) -> Self {
        Self { audit, events }
    }

    /// Every entry for the event in creation order, with performer display
    /// fields.
    pub async fn get_audit_trail(&self, event_id: EventId) -> AppResult<Vec<AuditTrailView>> {
        if self.events.find_event(event_id).await?.is_none() {
            return Err(AppError::not_found(format!("Event {event_id} not found")));
        }
        self.audit.list_for_event(event_id).await
    }
}
