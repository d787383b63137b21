//! End-to-end checks against a real PostgreSQL database.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use std::sync::Arc;

use eventflow_core::config::{DatabaseConfig, WorkflowConfig};
use eventflow_core::error::ErrorKind;
use eventflow_core::types::{EventId, UserId};
use eventflow_database::{DatabasePool, Storage, migration};
use eventflow_entity::audit::AuditAction;
use eventflow_entity::event::EventStatus;
use eventflow_entity::user::{ActorRole, UserSummary};
use eventflow_service::{
    AccessGuard, AuditService, MessageService, NotificationRules, RequestContext, SendMessage,
    WorkflowOrchestrator,
};

/// A migrated database with one organiser, one admin and a draft event.
struct TestDb {
    db: DatabasePool,
    storage: Storage,
    config: WorkflowConfig,
    organiser: UserSummary,
    admin: UserSummary,
    event_id: EventId,
}

impl TestDb {
    async fn new() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = DatabasePool::connect(&DatabaseConfig {
            url,
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 60,
            run_migrations: true,
        })
        .await
        .expect("Failed to connect to test database");

        migration::run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let organiser = Self::seed_user(&db, "Olive", ActorRole::Organiser).await;
        let admin = Self::seed_user(&db, "Ada", ActorRole::Admin).await;

        let event_id = EventId::new();
        sqlx::query(
            "INSERT INTO events (id, organiser_id, name, status) \
             VALUES ($1, $2, $3, 'draft'::event_status)",
        )
        .bind(event_id)
        .bind(organiser.id)
        .bind("Harbour Half Marathon")
        .execute(db.pool())
        .await
        .expect("Failed to seed event");

        Self {
            storage: Storage::postgres(db.clone()),
            db,
            config: WorkflowConfig::default(),
            organiser,
            admin,
            event_id,
        }
    }

    async fn seed_user(db: &DatabasePool, name: &str, role: ActorRole) -> UserSummary {
        let id = UserId::new();
        let user = UserSummary {
            id,
            display_name: name.to_string(),
            email: format!("{}+{id}@example.com", name.to_lowercase()),
            role,
            is_active: true,
        };
        sqlx::query(
            "INSERT INTO users (id, display_name, email, role, is_active) \
             VALUES ($1, $2, $3, $4::actor_role, TRUE)",
        )
        .bind(user.id)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(role.as_str())
        .execute(db.pool())
        .await
        .expect("Failed to seed user");
        user
    }

    fn orchestrator(&self) -> WorkflowOrchestrator {
        WorkflowOrchestrator::new(
            self.storage.workflow.clone(),
            AccessGuard::new(self.storage.users.clone()),
            NotificationRules::new(&self.config),
        )
    }

    fn messages(&self) -> MessageService {
        MessageService::new(
            self.storage.messages.clone(),
            self.storage.users.clone(),
            &self.config,
        )
    }

    fn ctx(user: &UserSummary) -> RequestContext {
        RequestContext::from_user(user.clone())
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_submit_and_approve_persist_atomically() {
    let t = TestDb::new().await;
    let orchestrator = t.orchestrator();

    let submitted = orchestrator
        .submit_for_approval(&TestDb::ctx(&t.organiser), t.event_id)
        .await
        .expect("submit");
    assert_eq!(submitted.event.status, EventStatus::PendingApproval);
    assert!(
        submitted
            .notifications
            .iter()
            .any(|n| n.user_id == t.admin.id)
    );

    let err = orchestrator
        .submit_for_approval(&TestDb::ctx(&t.organiser), t.event_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);

    orchestrator
        .approve(&TestDb::ctx(&t.admin), t.event_id)
        .await
        .expect("approve");

    let trail = AuditService::new(t.storage.audit.clone(), t.storage.workflow.clone())
        .get_audit_trail(t.event_id)
        .await
        .expect("trail");
    let actions: Vec<AuditAction> = trail.iter().map(|v| v.entry.action_type).collect();
    assert_eq!(
        actions,
        vec![AuditAction::SubmittedForApproval, AuditAction::Published]
    );

    let unread = t
        .storage
        .notifications
        .count_unread(t.organiser.id)
        .await
        .expect("count");
    assert_eq!(unread, 1);

    t.db.close().await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_audit_rows_reject_updates() {
    let t = TestDb::new().await;
    t.orchestrator()
        .submit_for_approval(&TestDb::ctx(&t.organiser), t.event_id)
        .await
        .expect("submit");

    let result = sqlx::query("UPDATE event_audit_trail SET message = 'edited' WHERE event_id = $1")
        .bind(t.event_id)
        .execute(t.db.pool())
        .await;
    assert!(result.is_err());

    t.db.close().await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_thread_resolves_reply_chain() {
    let t = TestDb::new().await;
    let messages = t.messages();
    let olive = TestDb::ctx(&t.organiser);
    let ada = TestDb::ctx(&t.admin);

    let root = messages
        .send(
            &olive,
            SendMessage {
                event_id: Some(t.event_id),
                recipient_id: t.admin.id,
                subject: "Parking".to_string(),
                body: "Can we use the north lot?".to_string(),
                parent_message_id: None,
            },
        )
        .await
        .expect("root");
    let reply = messages
        .send(
            &ada,
            SendMessage {
                event_id: None,
                recipient_id: t.organiser.id,
                subject: "Re: Parking".to_string(),
                body: "Yes, from 7am.".to_string(),
                parent_message_id: Some(root.id),
            },
        )
        .await
        .expect("reply");
    assert_eq!(reply.event_id, Some(t.event_id));

    let thread = messages.thread(&olive, root.id).await.expect("thread");
    let depths: Vec<u32> = thread.messages.iter().map(|m| m.depth).collect();
    assert_eq!(depths, vec![0, 1]);
    assert!(!thread.truncated);
    assert_eq!(thread.messages[1].message.id, reply.id);

    t.db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires DATABASE_URL"]
async fn test_row_lock_lets_one_concurrent_decision_win() {
    let t = TestDb::new().await;
    let orchestrator = Arc::new(t.orchestrator());
    orchestrator
        .submit_for_approval(&TestDb::ctx(&t.organiser), t.event_id)
        .await
        .expect("submit");

    let approve = {
        let orchestrator = orchestrator.clone();
        let ctx = TestDb::ctx(&t.admin);
        let event_id = t.event_id;
        tokio::spawn(async move { orchestrator.approve(&ctx, event_id).await })
    };
    let reject = {
        let orchestrator = orchestrator.clone();
        let ctx = TestDb::ctx(&t.admin);
        let event_id = t.event_id;
        tokio::spawn(async move { orchestrator.reject(&ctx, event_id, "no").await })
    };
    let approved = approve.await.expect("approve task");
    let rejected = reject.await.expect("reject task");

    assert!(approved.is_ok() ^ rejected.is_ok());
    let loser = approved.err().or(rejected.err()).expect("one loser");
    assert_eq!(loser.kind, ErrorKind::InvalidTransition);

    let trail = AuditService::new(t.storage.audit.clone(), t.storage.workflow.clone())
        .get_audit_trail(t.event_id)
        .await
        .expect("trail");
    let decisions = trail
        .iter()
        .filter(|v| {
            matches!(
                v.entry.action_type,
                AuditAction::Published | AuditAction::Rejected
            )
        })
        .count();
    assert_eq!(decisions, 1);

    t.db.close().await;
}
