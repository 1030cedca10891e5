//! Static per-route-group role allow-lists.

use crate::error::{AuthFailure, CoreError};
use crate::roles::Role;
use crate::session::Identity;

/// Message returned when an authenticated role is not on the allow-list.
pub const INSUFFICIENT_PERMISSIONS: &str = "you don't have permission to access this resource";

/// A set of roles admitted to a group of routes. Order is irrelevant.
#[derive(Debug, Clone, Copy)]
pub struct AllowList(&'static [Role]);

/// Roles allowed to manage user accounts.
pub const USER_MANAGERS: AllowList = AllowList::new(&[Role::SuperAdmin, Role::Admin]);

impl AllowList {
    pub const fn new(roles: &'static [Role]) -> Self {
        Self(roles)
    }

    pub fn permits(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Decide whether `identity` may proceed.
    ///
    /// A missing identity means authentication never ran and is treated as
    /// an authentication failure (401); a role outside the list is 403.
    pub fn check(&self, identity: Option<&Identity>) -> Result<Identity, CoreError> {
        let identity = identity.ok_or(CoreError::Unauthenticated(AuthFailure::MissingIdentity))?;
        if !self.permits(identity.role) {
            return Err(CoreError::Forbidden(INSUFFICIENT_PERMISSIONS.to_string()));
        }
        Ok(*identity)
    }
}
