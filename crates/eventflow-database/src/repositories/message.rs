//! Message repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use eventflow_core::error::{AppError, ErrorKind};
use eventflow_core::result::AppResult;
use eventflow_core::types::{ListLimit, MessageId, UserId, raw_ids};
use eventflow_entity::message::{Message, NewMessage};
use eventflow_entity::notification::Notification;

use super::notification::NotificationRepository;
use crate::store::{MessageNotice, MessageSnapshot, MessageStore};

/// Column list for `messages` queries.
const COLUMNS: &str = "id, event_id, sender_id, recipient_id, subject, body, \
    parent_message_id, read_at, created_at";

/// Repository for direct messages.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Create a new message repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn send(
        &self,
        message: &NewMessage,
        notice: &MessageNotice<'_>,
    ) -> AppResult<(Message, Notification)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // The self-referencing foreign key rejects a parent that does not exist.
        let query = format!(
            "INSERT INTO messages \
                (event_id, sender_id, recipient_id, subject, body, parent_message_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Message>(&query)
            .bind(message.event_id)
            .bind(message.sender_id)
            .bind(message.recipient_id)
            .bind(&message.subject)
            .bind(&message.body)
            .bind(message.parent_message_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to send message", e))?;

        let notification = NotificationRepository::insert(&mut tx, &notice(&created)).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok((created, notification))
    }

    async fn find_by_id(&self, message_id: MessageId) -> AppResult<Option<Message>> {
        let query = format!("SELECT {COLUMNS} FROM messages WHERE id = $1");
        sqlx::query_as::<_, Message>(&query)
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find message", e))
    }

    async fn list_for_user(&self, user_id: UserId, limit: ListLimit) -> AppResult<Vec<Message>> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE sender_id = $1 OR recipient_id = $1 \
             ORDER BY created_at DESC, seq DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(user_id)
            .bind(limit.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list messages", e))
    }

    async fn count_unread(&self, recipient_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE recipient_id = $1 AND read_at IS NULL",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    async fn mark_read(
        &self,
        message_id: MessageId,
        recipient_id: UserId,
    ) -> AppResult<Option<Message>> {
        let query = format!(
            "UPDATE messages SET read_at = NOW() \
             WHERE id = $1 AND recipient_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(message_id)
            .bind(recipient_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))
    }

    async fn snapshot(&self) -> AppResult<Box<dyn MessageSnapshot>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to open read snapshot", e)
            })?;
        Ok(Box::new(PgMessageSnapshot { tx }))
    }
}

/// A repeatable-read transaction; rolled back when dropped.
struct PgMessageSnapshot {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl MessageSnapshot for PgMessageSnapshot {
    async fn find(&mut self, message_id: MessageId) -> AppResult<Option<Message>> {
        let query = format!("SELECT {COLUMNS} FROM messages WHERE id = $1");
        sqlx::query_as::<_, Message>(&query)
            .bind(message_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find message", e))
    }

    async fn children_of(&mut self, parents: &[MessageId]) -> AppResult<Vec<Message>> {
        if parents.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE parent_message_id = ANY($1) \
             ORDER BY created_at ASC, seq ASC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(raw_ids(parents))
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load replies", e)
            })
    }
}
