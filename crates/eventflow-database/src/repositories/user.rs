//! User directory repository (read-only).

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use eventflow_core::error::{AppError, ErrorKind};
use eventflow_core::result::AppResult;
use eventflow_core::types::UserId;
use eventflow_entity::user::UserSummary;

use crate::store::UserDirectory;

/// Column list for `users` queries.
const COLUMNS: &str = "id, display_name, email, role, is_active";

/// Read-only access to the identity provider's `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Identifiers of every active admin, read inside a transaction.
    pub(crate) async fn active_admin_ids(conn: &mut PgConnection) -> AppResult<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT id FROM users WHERE role = 'admin' AND is_active ORDER BY id",
        )
        .fetch_all(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to resolve admins", e))
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserSummary>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserSummary>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }
}
