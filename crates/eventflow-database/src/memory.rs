//! In-memory storage using a Tokio mutex for single-node deployments and tests.
//!
//! Every trait operation runs under one lock, so the multi-write units of
//! work ([`WorkflowStore::commit`], [`MessageStore::send`]) are staged on
//! local values and applied only once every write has succeeded.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use eventflow_core::error::AppError;
use eventflow_core::result::AppResult;
use eventflow_core::types::{
    AuditEntryId, EventId, ListLimit, MessageId, NotificationId, UserId,
};
use eventflow_entity::audit::{AuditTrailEntry, AuditTrailView, NewAuditEntry};
use eventflow_entity::event::EventRecord;
use eventflow_entity::message::{Message, NewMessage};
use eventflow_entity::notification::{NewNotification, Notification};
use eventflow_entity::user::UserSummary;
use eventflow_entity::workflow::{Audience, WorkflowReceipt};

use crate::store::{
    AuditStore, HealthCheck, MessageNotice, MessageSnapshot, MessageStore, NotificationStore,
    UserDirectory, WorkflowDecision, WorkflowStore,
};

/// Internal state for the memory store.
#[derive(Debug, Default)]
struct InnerState {
    /// Users keyed by ID; ordered so admin fan-out matches the SQL `ORDER BY id`.
    users: BTreeMap<UserId, UserSummary>,
    /// Events keyed by ID.
    events: HashMap<EventId, EventRecord>,
    /// Audit entries in append order.
    audit: Vec<AuditTrailEntry>,
    /// Notifications in insertion order.
    notifications: Vec<Notification>,
    /// Messages in insertion order.
    messages: Vec<Message>,
    /// Last timestamp handed out.
    last_tick: Option<DateTime<Utc>>,
    /// When set, every notification write fails.
    fail_notification_writes: bool,
}

impl InnerState {
    /// A strictly increasing timestamp, so insertion order and `created_at`
    /// order always agree.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_tick {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(next);
        next
    }

    /// Build a notification row without storing it.
    fn stage_notification(&mut self, data: &NewNotification) -> AppResult<Notification> {
        if self.fail_notification_writes {
            return Err(AppError::database("Failed to create notification"));
        }
        if !self.users.contains_key(&data.user_id) {
            return Err(AppError::database(format!(
                "Failed to create notification: unknown recipient {}",
                data.user_id
            )));
        }
        Ok(Notification {
            id: NotificationId::new(),
            user_id: data.user_id,
            notification_type: data.notification_type.clone(),
            title: data.title.clone(),
            message: data.message.clone(),
            link: data.link.clone(),
            metadata: data.metadata.clone(),
            read_at: None,
            created_at: self.tick(),
        })
    }

    fn stage_audit(&mut self, data: &NewAuditEntry) -> AppResult<AuditTrailEntry> {
        if !self.events.contains_key(&data.event_id) {
            return Err(AppError::database(format!(
                "Failed to append audit entry: unknown event {}",
                data.event_id
            )));
        }
        Ok(AuditTrailEntry {
            id: AuditEntryId::new(),
            event_id: data.event_id,
            action_type: data.action_type,
            performed_by: data.performed_by,
            performed_by_role: data.performed_by_role,
            message: data.message.clone(),
            metadata: data.metadata.clone(),
            created_at: self.tick(),
        })
    }

    fn active_admin_ids(&self) -> Vec<UserId> {
        self.users
            .values()
            .filter(|u| u.role.is_admin() && u.is_active)
            .map(|u| u.id)
            .collect()
    }
}

/// In-memory implementation of every storage trait.
///
/// Clones share state, so a test can keep one handle for seeding while the
/// services hold another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, replacing any existing entry with the same ID.
    pub async fn insert_user(&self, user: UserSummary) {
        self.state.lock().await.users.insert(user.id, user);
    }

    /// Register an event, replacing any existing entry with the same ID.
    pub async fn insert_event(&self, event: EventRecord) {
        self.state.lock().await.events.insert(event.id, event);
    }

    /// Make every subsequent notification write fail until reset.
    pub async fn fail_notification_writes(&self, fail: bool) {
        self.state.lock().await.fail_notification_writes = fail;
    }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn find_event(&self, event_id: EventId) -> AppResult<Option<EventRecord>> {
        Ok(self.state.lock().await.events.get(&event_id).cloned())
    }

    async fn commit(
        &self,
        event_id: EventId,
        decide: &WorkflowDecision<'_>,
    ) -> AppResult<WorkflowReceipt> {
        let mut state = self.state.lock().await;

        let current = state
            .events
            .get(&event_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Event {event_id} not found")))?;
        let previous_status = current.status;
        let commit = decide(&current)?;

        let mut event = current;
        if let Some(status) = commit.new_status {
            event.status = status;
            event.updated_at = state.tick();
        }

        let audit_entry = state.stage_audit(&commit.audit)?;

        let mut notifications = Vec::new();
        if let Some(draft) = &commit.notification {
            let recipients = match draft.audience {
                Audience::ActiveAdmins => state.active_admin_ids(),
                Audience::User(user_id) => vec![user_id],
            };
            for recipient in recipients {
                notifications.push(state.stage_notification(&draft.addressed_to(recipient))?);
            }
        }

        state.events.insert(event_id, event.clone());
        state.audit.push(audit_entry.clone());
        state.notifications.extend(notifications.iter().cloned());

        debug!(
            event_id = %event_id,
            action = %audit_entry.action_type,
            notified = notifications.len(),
            "Workflow unit of work applied in memory"
        );

        Ok(WorkflowReceipt {
            event,
            previous_status,
            audit_entry,
            notifications,
        })
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, entry: &NewAuditEntry) -> AppResult<AuditTrailEntry> {
        let mut state = self.state.lock().await;
        let created = state.stage_audit(entry)?;
        state.audit.push(created.clone());
        Ok(created)
    }

    async fn list_for_event(&self, event_id: EventId) -> AppResult<Vec<AuditTrailView>> {
        let state = self.state.lock().await;
        Ok(state
            .audit
            .iter()
            .filter(|entry| entry.event_id == event_id)
            .map(|entry| {
                let performer = state.users.get(&entry.performed_by);
                AuditTrailView {
                    entry: entry.clone(),
                    performer_name: performer.map(|u| u.display_name.clone()),
                    performer_email: performer.map(|u| u.email.clone()),
                }
            })
            .collect())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, notification: &NewNotification) -> AppResult<Notification> {
        let mut state = self.state.lock().await;
        let created = state.stage_notification(notification)?;
        state.notifications.push(created.clone());
        Ok(created)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: ListLimit,
    ) -> AppResult<Vec<Notification>> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .take(limit.as_usize())
            .cloned()
            .collect())
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        let state = self.state.lock().await;
        let count = state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && n.is_unread())
            .count();
        Ok(count as i64)
    }

    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> AppResult<Option<Notification>> {
        let mut state = self.state.lock().await;
        let now = state.tick();
        Ok(state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id && n.user_id == user_id)
            .map(|n| {
                n.read_at = Some(now);
                n.clone()
            }))
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        let mut state = self.state.lock().await;
        let now = state.tick();
        Ok(state
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && n.is_unread())
            .map(|n| {
                n.read_at = Some(now);
                n.clone()
            })
            .collect())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn send(
        &self,
        message: &NewMessage,
        notice: &MessageNotice<'_>,
    ) -> AppResult<(Message, Notification)> {
        let mut state = self.state.lock().await;

        for user_id in [message.sender_id, message.recipient_id] {
            if !state.users.contains_key(&user_id) {
                return Err(AppError::database(format!(
                    "Failed to send message: unknown user {user_id}"
                )));
            }
        }
        if let Some(parent_id) = message.parent_message_id {
            if !state.messages.iter().any(|m| m.id == parent_id) {
                return Err(AppError::database(format!(
                    "Failed to send message: unknown parent {parent_id}"
                )));
            }
        }

        let created = Message {
            id: MessageId::new(),
            event_id: message.event_id,
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            subject: message.subject.clone(),
            body: message.body.clone(),
            parent_message_id: message.parent_message_id,
            read_at: None,
            created_at: state.tick(),
        };
        let notification = state.stage_notification(&notice(&created))?;

        state.messages.push(created.clone());
        state.notifications.push(notification.clone());
        Ok((created, notification))
    }

    async fn find_by_id(&self, message_id: MessageId) -> AppResult<Option<Message>> {
        let state = self.state.lock().await;
        Ok(state.messages.iter().find(|m| m.id == message_id).cloned())
    }

    async fn list_for_user(&self, user_id: UserId, limit: ListLimit) -> AppResult<Vec<Message>> {
        let state = self.state.lock().await;
        Ok(state
            .messages
            .iter()
            .rev()
            .filter(|m| m.is_visible_to(user_id))
            .take(limit.as_usize())
            .cloned()
            .collect())
    }

    async fn count_unread(&self, recipient_id: UserId) -> AppResult<i64> {
        let state = self.state.lock().await;
        let count = state
            .messages
            .iter()
            .filter(|m| m.recipient_id == recipient_id && m.is_unread())
            .count();
        Ok(count as i64)
    }

    async fn mark_read(
        &self,
        message_id: MessageId,
        recipient_id: UserId,
    ) -> AppResult<Option<Message>> {
        let mut state = self.state.lock().await;
        let now = state.tick();
        Ok(state
            .messages
            .iter_mut()
            .find(|m| m.id == message_id && m.recipient_id == recipient_id)
            .map(|m| {
                m.read_at = Some(now);
                m.clone()
            }))
    }

    async fn snapshot(&self) -> AppResult<Box<dyn MessageSnapshot>> {
        let messages = self.state.lock().await.messages.clone();
        Ok(Box::new(MemorySnapshot { messages }))
    }
}

/// A point-in-time copy of every message.
struct MemorySnapshot {
    messages: Vec<Message>,
}

#[async_trait]
impl MessageSnapshot for MemorySnapshot {
    async fn find(&mut self, message_id: MessageId) -> AppResult<Option<Message>> {
        Ok(self.messages.iter().find(|m| m.id == message_id).cloned())
    }

    async fn children_of(&mut self, parents: &[MessageId]) -> AppResult<Vec<Message>> {
        Ok(self
            .messages
            .iter()
            .filter(|m| m.parent_message_id.is_some_and(|p| parents.contains(&p)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserSummary>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> AppResult<bool> {
        Ok(true)
    }
}
