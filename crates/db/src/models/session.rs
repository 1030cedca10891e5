//! Session row model.

use inventory_core::error::CoreError;
use inventory_core::session::Session;
use inventory_core::types::{DbId, SessionId, Timestamp};
use sqlx::FromRow;

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: SessionId,
    pub user_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
    pub expired_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

impl TryFrom<SessionRow> for Session {
    type Error = CoreError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let role = row.role.parse().map_err(|_| {
            CoreError::Internal(format!("session {} has unknown role '{}'", row.id, row.role))
        })?;
        Ok(Session {
            id: row.id,
            user_id: row.user_id,
            role,
            created_at: row.created_at,
            expired_at: row.expired_at,
            revoked_at: row.revoked_at,
        })
    }
}
