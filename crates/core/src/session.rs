//! Server-side session records.
//!
//! A session is created by a successful login and is the only thing a bearer
//! token refers to. It carries a snapshot of the user's role taken at login
//! time, so authenticated requests never need to read the user record.
//!
//! A session is valid iff `revoked_at IS NULL AND expired_at > now()`.
//! Expiry is computed on read and never written; revocation is written at
//! most once.

use chrono::Duration;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AuthFailure;
use crate::roles::Role;
use crate::types::{DbId, SessionId, Timestamp};

/// Default session lifetime in hours.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Longest accepted session lifetime in hours (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: DbId,
    /// Role of the user when the session was issued.
    pub role: Role,
    pub created_at: Timestamp,
    pub expired_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

impl Session {
    /// Build a fresh session for `user_id` with a random 128-bit identifier.
    pub fn issue(user_id: DbId, role: Role, ttl: Duration, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            role,
            created_at: now,
            expired_at: now + ttl,
            revoked_at: None,
        }
    }

    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.revoked_at.is_none() && self.expired_at > now
    }

    /// The identity attached to requests authenticated by this session.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

/// The authenticated `{user_id, role}` pair for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: DbId,
    pub role: Role,
}

/// Parse the opaque bearer token into a session identifier.
pub fn parse_session_id(token: &str) -> Result<SessionId, AuthFailure> {
    Uuid::try_parse(token).map_err(|_| AuthFailure::MalformedCredential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fresh(now: Timestamp) -> Session {
        Session::issue(
            Uuid::new_v4(),
            Role::Staff,
            Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            now,
        )
    }

    #[test]
    fn issued_session_expires_after_ttl() {
        let now = Utc::now();
        let session = fresh(now);
        assert_eq!(session.expired_at - session.created_at, Duration::hours(24));
        assert!(session.revoked_at.is_none());
        assert!(session.is_valid_at(now));
    }

    #[test]
    fn issued_sessions_get_distinct_ids() {
        let now = Utc::now();
        assert_ne!(fresh(now).id, fresh(now).id);
    }

    #[test]
    fn session_is_invalid_at_and_after_expiry() {
        let now = Utc::now();
        let session = fresh(now);
        assert!(session.is_valid_at(session.expired_at - Duration::seconds(1)));
        assert!(!session.is_valid_at(session.expired_at));
        assert!(!session.is_valid_at(session.expired_at + Duration::hours(1)));
    }

    #[test]
    fn revoked_session_is_invalid() {
        let now = Utc::now();
        let mut session = fresh(now);
        session.revoked_at = Some(now);
        assert!(!session.is_valid_at(now));
    }

    #[test]
    fn identity_uses_the_role_snapshot() {
        let session = fresh(Utc::now());
        let identity = session.identity();
        assert_eq!(identity.user_id, session.user_id);
        assert_eq!(identity.role, Role::Staff);
    }

    #[test]
    fn parse_session_id_rejects_garbage() {
        assert_eq!(
            parse_session_id("not-a-token"),
            Err(AuthFailure::MalformedCredential)
        );
        assert_eq!(parse_session_id(""), Err(AuthFailure::MalformedCredential));

        let id = Uuid::new_v4();
        assert_eq!(parse_session_id(&id.to_string()), Ok(id));
    }
}
