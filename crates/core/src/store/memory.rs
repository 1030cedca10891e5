//! In-process implementations of the store traits.
//!
//! They follow the same contracts as the PostgreSQL repositories (lazy
//! expiry, idempotent revocation, soft delete, unique email) and are used
//! by unit and HTTP-level tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SessionStore, UserStore};
use crate::error::CoreError;
use crate::session::Session;
use crate::types::{DbId, SessionId, Timestamp};
use crate::user::{NewUser, User, UserChanges, UserQuery};

/// Session store backed by a map. Rows are never removed.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw row lookup, ignoring validity.
    pub async fn raw(&self, id: SessionId) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Number of stored rows, valid or not.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &Session) -> Result<(), CoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(CoreError::Conflict(format!(
                "session {} already exists",
                session.id
            )));
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn revoke(&self, id: SessionId) -> Result<(), CoreError> {
        if let Some(session) = self.sessions.write().await.get_mut(&id) {
            if session.revoked_at.is_none() {
                session.revoked_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn get_valid(&self, id: SessionId) -> Result<Option<Session>, CoreError> {
        let now = Utc::now();
        Ok(self
            .sessions
            .read()
            .await
            .get(&id)
            .filter(|s| s.is_valid_at(now))
            .cloned())
    }
}

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    deleted_at: Option<Timestamp>,
}

impl UserRecord {
    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    fn matches(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        self.user.name.to_lowercase().contains(&needle)
            || self.user.email.to_lowercase().contains(&needle)
    }
}

/// User store backed by a map keyed on id.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<DbId, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|r| r.is_live() && r.user.email == email)
            .map(|r| r.user.clone()))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, CoreError> {
        Ok(self
            .users
            .read()
            .await
            .get(&id)
            .filter(|r| r.is_live())
            .map(|r| r.user.clone()))
    }

    async fn create(&self, input: &NewUser) -> Result<User, CoreError> {
        let mut users = self.users.write().await;
        // The unique constraint covers soft-deleted rows too.
        if users.values().any(|r| r.user.email == input.email) {
            return Err(CoreError::Conflict("email already exists".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(
            user.id,
            UserRecord {
                user: user.clone(),
                deleted_at: None,
            },
        );
        Ok(user)
    }

    async fn update(&self, id: DbId, changes: &UserChanges) -> Result<Option<User>, CoreError> {
        let mut users = self.users.write().await;
        let Some(record) = users.get_mut(&id).filter(|r| r.is_live()) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            record.user.name = name.clone();
        }
        if let Some(role) = changes.role {
            record.user.role = role;
        }
        record.user.updated_at = Utc::now();
        Ok(Some(record.user.clone()))
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, CoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&id).filter(|r| r.is_live()) {
            Some(record) => {
                record.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self, search: &str) -> Result<i64, CoreError> {
        let count = self
            .users
            .read()
            .await
            .values()
            .filter(|r| r.is_live() && r.matches(search))
            .count();
        Ok(count as i64)
    }

    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, CoreError> {
        let users = self.users.read().await;
        let mut matching: Vec<User> = users
            .values()
            .filter(|r| r.is_live() && r.matches(&query.search))
            .map(|r| r.user.clone())
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit as usize)
            .collect())
    }
}
