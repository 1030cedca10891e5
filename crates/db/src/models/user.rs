//! User row model.

use inventory_core::error::CoreError;
use inventory_core::types::{DbId, Timestamp};
use inventory_core::user::User;
use sqlx::FromRow;

/// A live row from the `users` table (queries filter out `deleted_at`).
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<UserRow> for User {
    type Error = CoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse().map_err(|_| {
            CoreError::Internal(format!("user {} has unknown role '{}'", row.id, row.role))
        })?;
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
