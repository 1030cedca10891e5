pub mod auth;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                    login (public)
/// /auth/logout                   logout (requires auth)
///
/// /users                         list, create (super_admin, admin)
/// /users/{id}                    get, update, delete (super_admin, admin)
/// ```
///
/// The gates need the stores, so the state is passed in here as well as
/// being supplied to the finished router with `with_state`.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Authentication routes (login, logout).
        .merge(auth::router(state.clone()))
        // User management.
        .merge(users::router(state))
}
