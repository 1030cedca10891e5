//! Business operations behind the HTTP handlers.
//!
//! Services take the stores as trait objects and return [`CoreError`]
//! (`inventory_core::error::CoreError`), so they can be driven directly
//! against the in-memory stores in unit tests.

pub mod auth;
pub mod users;
