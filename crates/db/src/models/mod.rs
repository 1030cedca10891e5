//! Row structs for the `users` and `sessions` tables.
//!
//! Rows carry roles as raw text; converting into the domain types in
//! `inventory_core` validates them against the closed role set.

pub mod session;
pub mod user;
