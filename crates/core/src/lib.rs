//! Domain types and policies for the inventory backend.
//!
//! Nothing in this crate performs I/O. Persistence is reached through the
//! [`store::SessionStore`] and [`store::UserStore`] traits, implemented by
//! `inventory_db` for PostgreSQL and by [`store::memory`] for tests.

pub mod access;
pub mod error;
pub mod hierarchy;
pub mod pagination;
pub mod roles;
pub mod session;
pub mod store;
pub mod types;
pub mod user;
