//! Session-based authentication gate.
//!
//! Every protected route group is wrapped in [`authenticate`]. On success the
//! session's `{user_id, role}` snapshot is inserted into the request
//! extensions, where [`AuthUser`] and the RBAC gate pick it up. The user
//! record itself is never read here.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use inventory_core::error::{AuthFailure, CoreError};
use inventory_core::session::{parse_session_id, Identity};
use inventory_core::types::SessionId;

use crate::error::AppError;
use crate::state::AppState;

/// Extract the raw token from an `Authorization: Bearer <token>` header.
///
/// The value must split on single spaces into exactly two parts, the first
/// being `Bearer` (case-sensitive).
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthFailure> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthFailure::MissingCredential),
    };
    let raw = header
        .to_str()
        .map_err(|_| AuthFailure::MalformedCredential)?;

    let mut parts = raw.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthFailure::MalformedCredential),
    }
}

/// Parse the bearer header straight into a session id.
pub fn bearer_session_id(header: Option<&HeaderValue>) -> Result<SessionId, AuthFailure> {
    bearer_token(header).and_then(parse_session_id)
}

/// Authentication gate.
///
/// Looks the session up by id and admits the request only if it is
/// unrevoked and unexpired. Every failure is the same 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_id = bearer_session_id(request.headers().get(AUTHORIZATION))?;

    let session = state
        .sessions
        .get_valid(session_id)
        .await?
        .ok_or(AuthFailure::InvalidOrExpiredSession)?;

    let identity = session.identity();
    tracing::debug!(
        user_id = %identity.user_id,
        role = %identity.role,
        "Request authenticated"
    );
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Authenticated identity attached by [`authenticate`].
///
/// Use this as an extractor parameter in any handler behind the gate:
///
/// ```ignore
/// async fn my_handler(AuthUser(identity): AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %identity.user_id, role = %identity.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
///
/// A handler mounted without the gate gets a 401 rather than a panic.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(AuthUser)
            .ok_or(AppError::Core(CoreError::Unauthenticated(
                AuthFailure::MissingIdentity,
            )))
    }
}
