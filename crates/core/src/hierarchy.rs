//! Role-hierarchy rules for user-management operations.
//!
//! The gate-level allow-list only knows the requester's role. These rules
//! also depend on the target account, so they run inside the operation
//! after the target has been fetched from the store. The target role passed
//! in must come from that fetch, never from the request body.

use crate::error::CoreError;
use crate::roles::Role;

/// A user-management operation as seen by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMutation {
    /// Create an account with the given role.
    Create { role: Role },
    /// Change an existing account whose stored role is `current`.
    Update {
        current: Role,
        requested: Option<Role>,
    },
    /// Delete an existing account whose stored role is `current`.
    Delete { current: Role },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyViolation {
    #[error("forbidden: admin cannot create a super_admin")]
    AdminCreatesSuperAdmin,

    #[error("forbidden: admin cannot promote a user to super_admin")]
    AdminPromotesToSuperAdmin,

    #[error("forbidden: admin cannot modify a super_admin")]
    AdminModifiesSuperAdmin,

    #[error("forbidden: admin cannot delete a super_admin")]
    AdminDeletesSuperAdmin,

    #[error("forbidden: staff cannot manage users")]
    StaffManagesUsers,
}

impl From<HierarchyViolation> for CoreError {
    fn from(violation: HierarchyViolation) -> Self {
        CoreError::Forbidden(violation.to_string())
    }
}

/// Check whether `requester` may perform `mutation`.
///
/// Rules are evaluated in order and the first match rejects:
///
/// 1. `admin` creating or promoting to `super_admin`.
/// 2. `admin` updating or deleting an account that is currently `super_admin`.
///
/// `super_admin` is unrestricted. `staff` is normally stopped by the
/// allow-list before reaching here and is rejected outright if it does.
pub fn check_user_mutation(
    requester: Role,
    mutation: UserMutation,
) -> Result<(), HierarchyViolation> {
    match requester {
        Role::SuperAdmin => Ok(()),
        Role::Staff => Err(HierarchyViolation::StaffManagesUsers),
        Role::Admin => match mutation {
            UserMutation::Create {
                role: Role::SuperAdmin,
            } => Err(HierarchyViolation::AdminCreatesSuperAdmin),
            UserMutation::Update {
                requested: Some(Role::SuperAdmin),
                ..
            } => Err(HierarchyViolation::AdminPromotesToSuperAdmin),
            UserMutation::Update {
                current: Role::SuperAdmin,
                ..
            } => Err(HierarchyViolation::AdminModifiesSuperAdmin),
            UserMutation::Delete {
                current: Role::SuperAdmin,
            } => Err(HierarchyViolation::AdminDeletesSuperAdmin),
            _ => Ok(()),
        },
    }
}
