//! Repository for the `sessions` table.

use async_trait::async_trait;
use inventory_core::error::CoreError;
use inventory_core::session::Session;
use inventory_core::store::SessionStore;
use inventory_core::types::SessionId;
use sqlx::PgPool;

use super::map_db_error;
use crate::models::session::SessionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, role, created_at, expired_at, revoked_at";

/// PostgreSQL-backed [`SessionStore`].
#[derive(Debug, Clone)]
pub struct SessionRepo {
    pool: PgPool,
}

impl SessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a session row regardless of validity.
    pub async fn find_raw(&self, id: SessionId) -> Result<Option<Session>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(Session::try_from)
            .transpose()
    }
}

#[async_trait]
impl SessionStore for SessionRepo {
    async fn create(&self, session: &Session) -> Result<(), CoreError> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, role, created_at, expired_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.role.as_str())
        .bind(session.created_at)
        .bind(session.expired_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn revoke(&self, id: SessionId) -> Result<(), CoreError> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        tracing::debug!(session_id = %id, revoked = result.rows_affected(), "Session revoke");
        Ok(())
    }

    async fn get_valid(&self, id: SessionId) -> Result<Option<Session>, CoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE id = $1
               AND revoked_at IS NULL
               AND expired_at > NOW()"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(Session::try_from)
            .transpose()
    }
}
