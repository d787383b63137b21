//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use eventflow_core::config::{CorsConfig, WorkflowConfig};
use eventflow_database::Storage;
use eventflow_service::{
    AccessGuard, AuditService, ChangeRequestService, MessageService, NotificationRules,
    NotificationService, WorkflowOrchestrator,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// CORS settings applied by the router.
    pub cors: Arc<CorsConfig>,
    /// Storage handle (also used for health checks).
    pub storage: Storage,
    /// Caller identification.
    pub access: AccessGuard,
    /// Status transitions.
    pub orchestrator: Arc<WorkflowOrchestrator>,
    /// Change requests.
    pub change_requests: Arc<ChangeRequestService>,
    /// Audit trail reads.
    pub audit_service: Arc<AuditService>,
    /// Notification inbox.
    pub notification_service: Arc<NotificationService>,
    /// Direct messages.
    pub message_service: Arc<MessageService>,
}

impl AppState {
    /// Wires every service onto one storage handle.
    pub fn new(storage: Storage, workflow: &WorkflowConfig, cors: CorsConfig) -> Self {
        let access = AccessGuard::new(storage.users.clone());
        let rules = NotificationRules::new(workflow);

        Self {
            cors: Arc::new(cors),
            orchestrator: Arc::new(WorkflowOrchestrator::new(
                storage.workflow.clone(),
                access.clone(),
                rules.clone(),
            )),
            change_requests: Arc::new(ChangeRequestService::new(
                storage.workflow.clone(),
                rules,
            )),
            audit_service: Arc::new(AuditService::new(
                storage.audit.clone(),
                storage.workflow.clone(),
            )),
            notification_service: Arc::new(NotificationService::new(
                storage.notifications.clone(),
                workflow,
            )),
            message_service: Arc::new(MessageService::new(
                storage.messages.clone(),
                storage.users.clone(),
                workflow,
            )),
            access,
            storage,
        }
    }
}
