//! Handlers for the `/users` resource.
//!
//! The route group is wrapped in the authentication gate and the
//! [`USER_MANAGERS`](inventory_core::access::USER_MANAGERS) allow-list, so
//! every handler here runs for a `super_admin` or `admin`. Finer-grained
//! rules live in [`services::users`].

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use inventory_core::pagination::PageRequest;
use inventory_core::roles::Role;
use inventory_core::types::DbId;
use inventory_core::user::UserChanges;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{PathId, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, PaginatedResponse, UserResponse};
use crate::services;
use crate::services::users::CreateUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    /// Parsed into [`Role`] after validation.
    pub role: String,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, message = "must be at least 3 characters"))]
    pub name: Option<String>,
    pub role: Option<String>,
}

/// Query parameters for `GET /users`.
///
/// `page` and `limit` are kept as text so that empty or non-numeric values
/// fall back to the defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedUser {
    pub id: DbId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let role: Role = input.role.parse()?;

    let user = services::users::create_user(
        state.users.as_ref(),
        &requester,
        CreateUser {
            name: input.name,
            email: input.email,
            password: input.password,
            role,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// GET /api/v1/users
///
/// Paginated, searchable, ordered by name.
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListUsersParams>, QueryRejection>,
) -> AppResult<Json<PaginatedResponse<UserResponse>>> {
    let Query(params) = params.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected query string");
        AppError::BadRequest("invalid query parameters".to_string())
    })?;
    let page = PageRequest::parse(params.page.as_deref(), params.limit.as_deref());
    let (users, pagination) =
        services::users::list_users(state.users.as_ref(), params.search, page).await?;

    Ok(Json(PaginatedResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
        pagination,
    }))
}

/// GET /api/v1/users/{id}
pub async fn get(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = services::users::get_user(state.users.as_ref(), id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/users/{id}
///
/// Update name and/or role. Absent fields are left unchanged.
pub async fn update(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    PathId(id): PathId,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let role = input.role.as_deref().map(str::parse::<Role>).transpose()?;

    let user = services::users::update_user(
        state.users.as_ref(),
        &requester,
        id,
        UserChanges {
            name: input.name,
            role,
        },
    )
    .await?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<DataResponse<DeletedUser>>> {
    services::users::delete_user(state.users.as_ref(), &requester, id).await?;
    Ok(Json(DataResponse {
        data: DeletedUser { id },
    }))
}
