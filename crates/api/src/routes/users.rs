//! Route definitions for the `/users` resource.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use inventory_core::access::USER_MANAGERS;

use crate::handlers::users;
use crate::middleware::auth::authenticate;
use crate::middleware::rbac::require_role;
use crate::state::AppState;

/// Routes for user management, behind authentication and the
/// [`USER_MANAGERS`] allow-list.
///
/// ```text
/// GET    /users         -> list
/// POST   /users         -> create
/// GET    /users/{id}    -> get
/// PUT    /users/{id}    -> update
/// DELETE /users/{id}    -> delete
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    // Layers run last-added first: authenticate, then require_role.
    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route_layer(middleware::from_fn_with_state(USER_MANAGERS, require_role))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}
