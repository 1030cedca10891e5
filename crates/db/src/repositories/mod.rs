//! Repository layer.
//!
//! Each repository owns a clone of the pool and implements the matching
//! store trait from `inventory_core::store`.

pub mod session_repo;
pub mod user_repo;

pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;

use inventory_core::error::CoreError;

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error into a domain error.
///
/// Unique violations on `uq_`-prefixed constraints become
/// [`CoreError::Conflict`]; everything else is logged and becomes
/// [`CoreError::Internal`].
pub(crate) fn map_db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(conflict_message(constraint));
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(format!("database error: {err}"))
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_users_email" => "email already exists".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

/// Build an `ILIKE` pattern matching `search` as a literal substring.
pub(crate) fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
