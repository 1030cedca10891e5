//! Repository for the `users` table.
//!
//! Soft-deleted rows (`deleted_at IS NOT NULL`) are invisible to every query.

use async_trait::async_trait;
use inventory_core::error::CoreError;
use inventory_core::roles::Role;
use inventory_core::store::UserStore;
use inventory_core::types::DbId;
use inventory_core::user::{NewUser, User, UserChanges, UserQuery};
use sqlx::PgPool;
use uuid::Uuid;

use super::{contains_pattern, map_db_error};
use crate::models::user::UserRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user unless the email is already taken. Returns `true` if a
    /// row was inserted.
    pub async fn insert_if_absent(&self, input: &NewUser) -> Result<bool, CoreError> {
        let result = sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, input: &NewUser) -> Result<User, CoreError> {
        let query = format!(
            "INSERT INTO users (id, name, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        User::try_from(row)
    }

    async fn update(&self, id: DbId, changes: &UserChanges) -> Result<Option<User>, CoreError> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                role = COALESCE($3, role)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(changes.role.map(Role::as_str))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, CoreError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, search: &str) -> Result<i64, CoreError> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users
             WHERE deleted_at IS NULL AND (name ILIKE $1 OR email ILIKE $1)",
        )
        .bind(contains_pattern(search))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(total)
    }

    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, CoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM users
             WHERE deleted_at IS NULL AND (name ILIKE $1 OR email ILIKE $1)
             ORDER BY name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(contains_pattern(&query.search))
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(map_db_error)
    }
}
