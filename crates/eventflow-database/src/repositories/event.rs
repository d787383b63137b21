//! Event status repository: the transactional side of the workflow.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use eventflow_core::error::{AppError, ErrorKind};
use eventflow_core::result::AppResult;
use eventflow_core::types::EventId;
use eventflow_entity::event::EventRecord;
use eventflow_entity::workflow::{Audience, WorkflowReceipt};

use super::audit::AuditTrailRepository;
use super::notification::NotificationRepository;
use super::user::UserRepository;
use crate::store::{WorkflowDecision, WorkflowStore};

/// Column list for `events` queries.
const COLUMNS: &str = "id, organiser_id, name, status, created_at, updated_at";

/// Repository for the `status` column of collaborator-owned `events` rows.
#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkflowStore for EventRepository {
    async fn find_event(&self, event_id: EventId) -> AppResult<Option<EventRecord>> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, EventRecord>(&query)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find event", e))
    }

    async fn commit(
        &self,
        event_id: EventId,
        decide: &WorkflowDecision<'_>,
    ) -> AppResult<WorkflowReceipt> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Row lock serialises concurrent transitions on the same event.
        let lock_query = format!("SELECT {COLUMNS} FROM events WHERE id = $1 FOR UPDATE");
        let event = sqlx::query_as::<_, EventRecord>(&lock_query)
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock event", e))?
            .ok_or_else(|| AppError::not_found(format!("Event {event_id} not found")))?;

        let previous_status = event.status;
        let commit = decide(&event)?;

        let event = match commit.new_status {
            Some(status) => {
                let update_query = format!(
                    "UPDATE events SET status = $2, updated_at = NOW() \
                     WHERE id = $1 RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, EventRecord>(&update_query)
                    .bind(event_id)
                    .bind(status)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(
                            ErrorKind::Database,
                            "Failed to update event status",
                            e,
                        )
                    })?
            }
            None => event,
        };

        let audit_entry = AuditTrailRepository::insert(&mut tx, &commit.audit).await?;

        let mut notifications = Vec::new();
        if let Some(draft) = &commit.notification {
            let recipients = match draft.audience {
                Audience::ActiveAdmins => UserRepository::active_admin_ids(&mut tx).await?,
                Audience::User(user_id) => vec![user_id],
            };
            for recipient in recipients {
                let created =
                    NotificationRepository::insert(&mut tx, &draft.addressed_to(recipient))
                        .await?;
                notifications.push(created);
            }
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        debug!(
            event_id = %event_id,
            action = %audit_entry.action_type,
            notified = notifications.len(),
            "Workflow unit of work committed"
        );

        Ok(WorkflowReceipt {
            event,
            previous_status,
            audit_entry,
            notifications,
        })
    }
}
