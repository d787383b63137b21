//! Shared fixtures for service tests, backed by the in-memory store.

use async_trait::async_trait;
use chrono::Utc;

use eventflow_core::config::{AdminFanout, WorkflowConfig};
use eventflow_core::error::AppError;
use eventflow_core::result::AppResult;
use eventflow_core::types::{EventId, UserId};
use eventflow_database::{MemoryStore, Storage, UserDirectory};
use eventflow_entity::event::{EventRecord, EventStatus};
use eventflow_entity::user::{ActorRole, UserSummary};

use crate::{
    AccessGuard, AuditService, ChangeRequestService, MessageService, NotificationRules,
    NotificationService, RequestContext, WorkflowOrchestrator,
};

/// One organiser ("Olive"), one admin ("Ada") and a draft event owned by
/// the organiser.
pub(crate) struct Fixture {
    pub store: MemoryStore,
    pub storage: Storage,
    pub config: WorkflowConfig,
    pub organiser: UserSummary,
    pub admin: UserSummary,
    pub event: EventRecord,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::build(|_| AdminFanout::Broadcast).await
    }

    /// Admin-role notifications go to the fixture admin only.
    pub async fn with_designated_admin() -> Self {
        Self::build(|admin| AdminFanout::Designated { user_id: admin }).await
    }

    async fn build(fanout: impl FnOnce(UserId) -> AdminFanout) -> Self {
        let store = MemoryStore::new();
        let organiser = user("Olive", ActorRole::Organiser, true);
        let admin = user("Ada", ActorRole::Admin, true);
        store.insert_user(organiser.clone()).await;
        store.insert_user(admin.clone()).await;

        let event = event(organiser.id, EventStatus::Draft);
        store.insert_event(event.clone()).await;

        let config = WorkflowConfig {
            admin_fanout: fanout(admin.id),
            ..WorkflowConfig::default()
        };

        Self {
            storage: Storage::memory(store.clone()),
            store,
            config,
            organiser,
            admin,
            event,
        }
    }

    pub async fn add_user(&self, name: &str, role: ActorRole, is_active: bool) -> UserSummary {
        let user = user(name, role, is_active);
        self.store.insert_user(user.clone()).await;
        user
    }

    /// Another event owned by the fixture organiser.
    pub async fn add_event(&self, status: EventStatus) -> EventRecord {
        let event = event(self.organiser.id, status);
        self.store.insert_event(event.clone()).await;
        event
    }

    pub fn ctx(user: &UserSummary) -> RequestContext {
        RequestContext::from_user(user.clone())
    }

    pub fn organiser_ctx(&self) -> RequestContext {
        Self::ctx(&self.organiser)
    }

    pub fn admin_ctx(&self) -> RequestContext {
        Self::ctx(&self.admin)
    }

    pub fn rules(&self) -> NotificationRules {
        NotificationRules::new(&self.config)
    }

    pub fn orchestrator(&self) -> WorkflowOrchestrator {
        WorkflowOrchestrator::new(
            self.storage.workflow.clone(),
            AccessGuard::new(self.storage.users.clone()),
            self.rules(),
        )
    }

    pub fn change_requests(&self) -> ChangeRequestService {
        ChangeRequestService::new(self.storage.workflow.clone(), self.rules())
    }

    pub fn audit(&self) -> AuditService {
        AuditService::new(self.storage.audit.clone(), self.storage.workflow.clone())
    }

    pub fn notifications(&self) -> NotificationService {
        NotificationService::new(self.storage.notifications.clone(), &self.config)
    }

    pub fn messages(&self) -> MessageService {
        MessageService::new(
            self.storage.messages.clone(),
            self.storage.users.clone(),
            &self.config,
        )
    }

    /// Unread notification count of `user`.
    pub async fn unread_for(&self, user: &UserSummary) -> i64 {
        self.storage
            .notifications
            .count_unread(user.id)
            .await
            .unwrap_or(-1)
    }
}

fn user(name: &str, role: ActorRole, is_active: bool) -> UserSummary {
    let id = UserId::new();
    UserSummary {
        id,
        display_name: name.to_string(),
        email: format!("{}+{id}@example.com", name.to_lowercase()),
        role,
        is_active,
    }
}

fn event(organiser_id: UserId, status: EventStatus) -> EventRecord {
    let now = Utc::now();
    EventRecord {
        id: EventId::new(),
        organiser_id,
        name: "Harbour Half Marathon".to_string(),
        status,
        created_at: now,
        updated_at: now,
    }
}

/// A directory whose every lookup fails.
pub(crate) struct FailingDirectory;

#[async_trait]
impl UserDirectory for FailingDirectory {
    async fn find_user(&self, _user_id: UserId) -> AppResult<Option<UserSummary>> {
        Err(AppError::database("directory unavailable"))
    }
}
