//! User accounts as seen by the domain layer.

use crate::pagination::PageRequest;
use crate::roles::Role;
use crate::types::{DbId, Timestamp};

/// A live (not soft-deleted) user account.
///
/// Contains the password hash -- never serialize this to API responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update of a user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// Filter for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Case-insensitive substring matched against name or email. Empty matches all.
    pub search: String,
    pub page: PageRequest,
}
