use crate::types::DbId;

/// Why a request could not be authenticated.
///
/// The variants exist for logging only. Every one of them is reported to the
/// client with the same status and message so callers cannot tell which
/// check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("missing authorization header")]
    MissingCredential,

    #[error("malformed authorization header")]
    MalformedCredential,

    #[error("session not found, expired or revoked")]
    InvalidOrExpiredSession,

    #[error("no authenticated identity attached to the request")]
    MissingIdentity,

    #[error("unknown email or wrong password")]
    InvalidCredentials,
}

impl AuthFailure {
    /// The message returned to the client.
    pub fn public_message(self) -> &'static str {
        match self {
            AuthFailure::InvalidCredentials => "invalid email or password",
            _ => "invalid or expired token",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(#[from] AuthFailure),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
