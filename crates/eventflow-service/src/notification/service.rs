//! Per-user notification inbox.

use std::sync::Arc;

use tracing::info;

use eventflow_core::config::WorkflowConfig;
use eventflow_core::error::AppError;
use eventflow_core::result::AppResult;
use eventflow_core::types::{ListLimit, NotificationId};
use eventflow_database::NotificationStore;
use eventflow_entity::notification::{NewNotification, Notification};

use crate::context::RequestContext;

/// Manages the current user's notifications.
#[derive(Clone)]
pub struct NotificationService {
    /// Notification storage.
    store: Arc<dyn NotificationStore>,
    /// Default page size.
    default_limit: u32,
    /// Largest accepted page size.
    max_limit: u32,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("default_limit", &self.default_limit)
            .field("max_limit", &self.max_limit)
            .finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>, config: &WorkflowConfig) -> Self {
        Self {
            store,
            default_limit: config.default_list_limit,
            max_limit: config.max_list_limit,
        }
    }

    /// Creates a notification for any user.
    pub async fn create(&self, notification: &NewNotification) -> AppResult<Notification> {
        self.store.create(notification).await
    }

    /// Lists the caller's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        limit: Option<u32>,
    ) -> AppResult<Vec<Notification>> {
        let limit = ListLimit::resolve(limit, self.default_limit, self.max_limit);
        self.store.list_for_user(ctx.user_id, limit).await
    }

    /// Gets the caller's unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.store.count_unread(ctx.user_id).await
    }

    /// Marks one of the caller's notifications as read.
    ///
    /// Someone else's notification is reported as not found.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: NotificationId,
    ) -> AppResult<Notification> {
        self.store
            .mark_read(notification_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {notification_id} not found")))
    }

    /// Marks every unread notification of the caller as read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<Vec<Notification>> {
        let updated = self.store.mark_all_read(ctx.user_id).await?;
        info!(user_id = %ctx.user_id, count = updated.len(), "Marked all notifications read");
        Ok(updated)
    }
}
