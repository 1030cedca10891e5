//! The closed set of user roles.
//!
//! Role names are stored as text in the `users.role` and `sessions.role`
//! columns; the check constraint in `20260301000001_create_users.sql`
//! must list the same names as [`Role::as_str`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";

/// Error message for role strings outside the closed set.
pub const INVALID_ROLE_MESSAGE: &str = "invalid user role. Must be super_admin, admin, or staff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Staff,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::SuperAdmin, Role::Admin, Role::Staff];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => ROLE_SUPER_ADMIN,
            Role::Admin => ROLE_ADMIN,
            Role::Staff => ROLE_STAFF,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_SUPER_ADMIN => Ok(Role::SuperAdmin),
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_STAFF => Ok(Role::Staff),
            _ => Err(CoreError::Validation(INVALID_ROLE_MESSAGE.to_string())),
        }
    }
}
