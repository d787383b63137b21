//! Audit trail repository implementation.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use eventflow_core::error::{AppError, ErrorKind};
use eventflow_core::result::AppResult;
use eventflow_core::types::EventId;
use eventflow_entity::audit::{AuditTrailEntry, AuditTrailView, NewAuditEntry};

use crate::store::AuditStore;

/// Column list for `event_audit_trail` queries.
const ENTRY_COLUMNS: &str = "id, event_id, action_type, performed_by, performed_by_role, \
    message, metadata, created_at";

/// Repository for the append-only `event_audit_trail` table.
#[derive(Debug, Clone)]
pub struct AuditTrailRepository {
    pool: PgPool,
}

impl AuditTrailRepository {
    /// Create a new audit trail repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an entry on an existing connection or transaction.
    pub(crate) async fn insert(
        conn: &mut PgConnection,
        data: &NewAuditEntry,
    ) -> AppResult<AuditTrailEntry> {
        let query = format!(
            "INSERT INTO event_audit_trail \
                (event_id, action_type, performed_by, performed_by_role, message, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ENTRY_COLUMNS}"
        );
        sqlx::query_as::<_, AuditTrailEntry>(&query)
            .bind(data.event_id)
            .bind(data.action_type)
            .bind(data.performed_by)
            .bind(data.performed_by_role)
            .bind(&data.message)
            .bind(&data.metadata)
            .fetch_one(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to append audit entry", e)
            })
    }
}

#[async_trait]
impl AuditStore for AuditTrailRepository {
    async fn append(&self, entry: &NewAuditEntry) -> AppResult<AuditTrailEntry> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        Self::insert(&mut conn, entry).await
    }

    async fn list_for_event(&self, event_id: EventId) -> AppResult<Vec<AuditTrailView>> {
        sqlx::query_as::<_, AuditTrailView>(
            "SELECT a.id, a.event_id, a.action_type, a.performed_by, a.performed_by_role, \
                    a.message, a.metadata, a.created_at, \
                    u.display_name AS performer_name, u.email AS performer_email \
             FROM event_audit_trail a \
             LEFT JOIN users u ON u.id = a.performed_by \
             WHERE a.event_id = $1 \
             ORDER BY a.created_at ASC, a.seq ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list audit trail", e))
    }
}
