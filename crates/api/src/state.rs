use std::sync::Arc;

use inventory_core::store::{SessionStore, UserStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The stores are
/// trait objects so the same router runs on PostgreSQL in production and on
/// the in-memory stores in tests.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (session TTL is read by the login handler).
    pub config: Arc<ServerConfig>,
    /// Session persistence used by the authentication gate and login/logout.
    pub sessions: Arc<dyn SessionStore>,
    /// User persistence used by login and user management.
    pub users: Arc<dyn UserStore>,
}
