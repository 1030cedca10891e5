//! Role-based access control gate.
//!
//! Runs after [`authenticate`](super::auth::authenticate) and checks the
//! attached identity's role against a static [`AllowList`]:
//!
//! ```ignore
//! Router::new()
//!     .route("/users", get(users::list))
//!     .route_layer(middleware::from_fn_with_state(USER_MANAGERS, require_role))
//!     .route_layer(middleware::from_fn_with_state(state, authenticate))
//! ```

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use inventory_core::access::AllowList;
use inventory_core::session::Identity;

use crate::error::AppError;

/// Admit the request only if its identity's role is in `allowed`.
///
/// No identity (the gate was mounted without authentication) is a 401; a
/// role outside the list is a 403.
pub async fn require_role(
    State(allowed): State<AllowList>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    allowed.check(request.extensions().get::<Identity>())?;
    Ok(next.run(request).await)
}
