//! Request extractors that reject with [`AppError`] instead of axum's
//! plain-text rejections, so every 4xx carries the JSON error body.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use inventory_core::error::CoreError;
use inventory_core::types::DbId;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// Message for a body that is not valid JSON or does not match the DTO.
pub const INVALID_PAYLOAD_MESSAGE: &str = "invalid request payload format";

/// JSON body that has been deserialized and passed its `validator` rules.
///
/// ```ignore
/// async fn create(ValidatedJson(input): ValidatedJson<CreateUserRequest>) -> AppResult<...>
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection, "Rejected request body");
            AppError::BadRequest(INVALID_PAYLOAD_MESSAGE.to_string())
        })?;
        value
            .validate()
            .map_err(|errors| CoreError::Validation(describe(&errors)))?;
        Ok(ValidatedJson(value))
    }
}

/// Flatten field errors into `"field: message; field: message"`, sorted by
/// field name so the output is stable.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{field}: {message}")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// A `{id}` path segment parsed as a UUID. Anything else is a 400.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub DbId);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<DbId>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| PathId(id))
            .map_err(|_| AppError::BadRequest("invalid id format".to_string()))
    }
}
