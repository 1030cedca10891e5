//! Route definitions for the `/auth` resource.

use axum::middleware;
use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::middleware::auth::authenticate;
use crate::state::AppState;

/// Routes for login and logout.
///
/// ```text
/// POST /auth/login    -> login
/// POST /auth/logout   -> logout (requires auth)
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route_layer(middleware::from_fn_with_state(state, authenticate));

    Router::new()
        .route("/auth/login", post(auth::login))
        .merge(protected)
}
