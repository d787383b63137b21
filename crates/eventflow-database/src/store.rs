//! Storage traits consumed by the service layer.
//!
//! Every trait has a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory implementation in [`crate::memory`]. Implementations
//! must guarantee that [`WorkflowStore::commit`] and [`MessageStore::send`]
//! are all-or-nothing.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use eventflow_core::result::AppResult;
use eventflow_core::types::{EventId, ListLimit, MessageId, NotificationId, UserId};
use eventflow_entity::audit::{AuditTrailEntry, AuditTrailView, NewAuditEntry};
use eventflow_entity::event::EventRecord;
use eventflow_entity::message::{Message, NewMessage};
use eventflow_entity::notification::{NewNotification, Notification};
use eventflow_entity::user::UserSummary;
use eventflow_entity::workflow::{WorkflowCommit, WorkflowReceipt};

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{
    AuditTrailRepository, EventRepository, MessageRepository, NotificationRepository,
    UserRepository,
};

/// Decides what to write given the event as read under lock.
///
/// Returning an error aborts the unit of work with nothing persisted.
pub type WorkflowDecision<'a> = dyn Fn(&EventRecord) -> AppResult<WorkflowCommit> + Send + Sync + 'a;

/// Builds the recipient notification for a freshly inserted message.
pub type MessageNotice<'a> = dyn Fn(&Message) -> NewNotification + Send + Sync + 'a;

/// Event status transitions and their audit/notification side effects.
#[async_trait]
pub trait WorkflowStore: Send + Sync + 'static {
    /// Read an event without locking it.
    async fn find_event(&self, event_id: EventId) -> AppResult<Option<EventRecord>>;

    /// Lock the event, run `decide` against it, and persist the resulting
    /// status write, audit entry, and notifications in one transaction.
    ///
    /// Fails with `NotFound` if the event does not exist.
    async fn commit(
        &self,
        event_id: EventId,
        decide: &WorkflowDecision<'_>,
    ) -> AppResult<WorkflowReceipt>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditStore: Send + Sync + 'static {
    /// Append one entry. Never touches existing rows.
    async fn append(&self, entry: &NewAuditEntry) -> AppResult<AuditTrailEntry>;

    /// All entries for an event in creation order, joined with performer
    /// display fields.
    async fn list_for_event(&self, event_id: EventId) -> AppResult<Vec<AuditTrailView>>;
}

/// Per-user notification inbox.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Create a notification.
    async fn create(&self, notification: &NewNotification) -> AppResult<Notification>;

    /// Newest first, at most `limit` rows.
    async fn list_for_user(&self, user_id: UserId, limit: ListLimit)
    -> AppResult<Vec<Notification>>;

    /// Number of unread notifications.
    async fn count_unread(&self, user_id: UserId) -> AppResult<i64>;

    /// Stamp `read_at` on a notification owned by `user_id`.
    ///
    /// Returns `None` if it does not exist or belongs to someone else.
    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> AppResult<Option<Notification>>;

    /// Stamp `read_at` on every unread notification of `user_id`, returning
    /// the rows that changed.
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<Vec<Notification>>;
}

/// Direct messages and reply links.
#[async_trait]
pub trait MessageStore: Send + Sync + 'static {
    /// Insert a message and its recipient notification in one transaction.
    ///
    /// The parent, if any, must already exist.
    async fn send(
        &self,
        message: &NewMessage,
        notice: &MessageNotice<'_>,
    ) -> AppResult<(Message, Notification)>;

    /// Find a message by ID, regardless of visibility.
    async fn find_by_id(&self, message_id: MessageId) -> AppResult<Option<Message>>;

    /// Messages sent or received by `user_id`, newest first.
    async fn list_for_user(&self, user_id: UserId, limit: ListLimit) -> AppResult<Vec<Message>>;

    /// Number of unread messages addressed to `recipient_id`.
    async fn count_unread(&self, recipient_id: UserId) -> AppResult<i64>;

    /// Stamp `read_at` on a message addressed to `recipient_id`.
    async fn mark_read(
        &self,
        message_id: MessageId,
        recipient_id: UserId,
    ) -> AppResult<Option<Message>>;

    /// Open a consistent read-only view for thread resolution.
    async fn snapshot(&self) -> AppResult<Box<dyn MessageSnapshot>>;
}

/// A consistent read-only view over messages.
#[async_trait]
pub trait MessageSnapshot: Send {
    /// Find a message by ID.
    async fn find(&mut self, message_id: MessageId) -> AppResult<Option<Message>>;

    /// Direct replies to any of `parents`.
    async fn children_of(&mut self, parents: &[MessageId]) -> AppResult<Vec<Message>>;
}

/// Read-only view of the identity provider.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Look up a user.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserSummary>>;
}

/// Storage liveness probe.
#[async_trait]
pub trait HealthCheck: Send + Sync + 'static {
    /// Returns `true` if the backend answered.
    async fn ping(&self) -> AppResult<bool>;
}

/// The storage handle passed into every service constructor.
#[derive(Clone)]
pub struct Storage {
    /// Event status transitions.
    pub workflow: Arc<dyn WorkflowStore>,
    /// Audit trail.
    pub audit: Arc<dyn AuditStore>,
    /// Notification inboxes.
    pub notifications: Arc<dyn NotificationStore>,
    /// Direct messages.
    pub messages: Arc<dyn MessageStore>,
    /// Identity provider view.
    pub users: Arc<dyn UserDirectory>,
    /// Liveness probe.
    pub health: Arc<dyn HealthCheck>,
}

impl Storage {
    /// Storage backed by PostgreSQL repositories sharing one pool.
    pub fn postgres(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            workflow: Arc::new(EventRepository::new(pool.clone())),
            audit: Arc::new(AuditTrailRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            messages: Arc::new(MessageRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
            health: Arc::new(db),
        }
    }

    /// Storage backed by one in-memory store.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            workflow: store.clone(),
            audit: store.clone(),
            notifications: store.clone(),
            messages: store.clone(),
            users: store.clone(),
            health: store,
        }
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
