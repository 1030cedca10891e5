//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- Session issuance (login) and revocation (logout).

pub mod password;
pub mod session;
