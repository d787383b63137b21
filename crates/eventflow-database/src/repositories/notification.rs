//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use eventflow_core::error::{AppError, ErrorKind};
use eventflow_core::result::AppResult;
use eventflow_core::types::{ListLimit, NotificationId, UserId};
use eventflow_entity::notification::{NewNotification, Notification};

use crate::store::NotificationStore;

/// Column list for `notifications` queries.
const COLUMNS: &str =
    "id, user_id, notification_type, title, message, link, metadata, read_at, created_at";

/// Repository for notification inboxes.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification on an existing connection or transaction.
    pub(crate) async fn insert(
        conn: &mut PgConnection,
        data: &NewNotification,
    ) -> AppResult<Notification> {
        let query = format!(
            "INSERT INTO notifications \
                (user_id, notification_type, title, message, link, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(data.user_id)
            .bind(&data.notification_type)
            .bind(&data.title)
            .bind(&data.message)
            .bind(&data.link)
            .bind(&data.metadata)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
            })
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, notification: &NewNotification) -> AppResult<Notification> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        Self::insert(&mut conn, notification).await
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: ListLimit,
    ) -> AppResult<Vec<Notification>> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, seq DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
            })
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> AppResult<Option<Notification>> {
        let query = format!(
            "UPDATE notifications SET read_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(notification_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        let query = format!(
            "UPDATE notifications SET read_at = NOW() \
             WHERE user_id = $1 AND read_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))
    }
}
