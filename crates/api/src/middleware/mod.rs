//! Authentication and authorization gates.
//!
//! - [`auth::authenticate`] -- Resolves the bearer token to a session and
//!   attaches the [`Identity`](inventory_core::session::Identity) to the request.
//! - [`auth::AuthUser`] -- Handler extractor for the attached identity.
//! - [`rbac::require_role`] -- Rejects identities whose role is not on the
//!   route group's allow-list.

pub mod auth;
pub mod rbac;
