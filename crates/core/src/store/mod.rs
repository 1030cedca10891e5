//! Persistence seams for sessions and users.
//!
//! Handlers and middleware hold these as `Arc<dyn SessionStore>` /
//! `Arc<dyn UserStore>` so the gates and the hierarchy policy can be
//! exercised against [`memory`] without a database.

pub mod memory;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::session::Session;
use crate::types::{DbId, SessionId};
use crate::user::{NewUser, User, UserChanges, UserQuery};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a newly issued session.
    async fn create(&self, session: &Session) -> Result<(), CoreError>;

    /// Set `revoked_at = now()` unless already revoked.
    ///
    /// Revoking an unknown or already-revoked session succeeds and changes
    /// nothing.
    async fn revoke(&self, id: SessionId) -> Result<(), CoreError>;

    /// Fetch the session only if it is currently valid.
    ///
    /// Missing, expired and revoked sessions all yield `Ok(None)`.
    async fn get_valid(&self, id: SessionId) -> Result<Option<Session>, CoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, CoreError>;

    /// Insert a user. A duplicate email yields [`CoreError::Conflict`].
    async fn create(&self, input: &NewUser) -> Result<User, CoreError>;

    /// Apply `changes`, returning `None` if no live user has this id.
    async fn update(&self, id: DbId, changes: &UserChanges) -> Result<Option<User>, CoreError>;

    /// Soft-delete a user. Returns `true` if a live row was marked deleted.
    async fn soft_delete(&self, id: DbId) -> Result<bool, CoreError>;

    /// Count live users matching `search`.
    async fn count(&self, search: &str) -> Result<i64, CoreError>;

    /// One page of live users matching the query, ordered by name.
    async fn list(&self, query: &UserQuery) -> Result<Vec<User>, CoreError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
