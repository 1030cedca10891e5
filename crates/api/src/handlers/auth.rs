//! Handlers for the `/auth` resource (login, logout).

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::auth::session::revoke_session;
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::auth::{bearer_token, AuthUser};
use crate::response::{DataResponse, UserResponse};
use crate::services;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
///
/// No field rules: a malformed email or empty password is just a credential
/// that does not match, and fails like one.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Opaque bearer token naming the new session.
    pub access_token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns a session token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = services::auth::login(
        state.users.as_ref(),
        state.sessions.as_ref(),
        &input.email,
        &input.password,
        state.config.session_ttl(),
    )
    .await?;

    Ok(Json(LoginResponse {
        access_token: outcome.session.id.to_string(),
        user: UserResponse::from(outcome.user),
    }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the session that authenticated this request.
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    headers: HeaderMap,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let token = bearer_token(headers.get(AUTHORIZATION))?;
    revoke_session(state.sessions.as_ref(), token).await?;

    tracing::info!(user_id = %identity.user_id, "Logged out");
    Ok(Json(DataResponse {
        data: json!({ "message": "logged out" }),
    }))
}
