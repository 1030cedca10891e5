//! Session issuance and revocation.

use chrono::{Duration, Utc};
use inventory_core::error::CoreError;
use inventory_core::session::{parse_session_id, Session};
use inventory_core::store::SessionStore;
use inventory_core::user::User;

/// Create and persist a session for `user` expiring `ttl` from now.
///
/// The role is snapshotted from `user`. If the write fails the session is
/// dropped and only the error is returned, so the token never reaches the
/// client.
pub async fn issue_session(
    store: &dyn SessionStore,
    user: &User,
    ttl: Duration,
) -> Result<Session, CoreError> {
    let session = Session::issue(user.id, user.role, ttl, Utc::now());
    if let Err(e) = store.create(&session).await {
        tracing::error!(user_id = %user.id, error = %e, "Failed to persist session");
        return Err(e);
    }
    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        expired_at = %session.expired_at,
        "Session issued"
    );
    Ok(session)
}

/// Revoke the session named by a raw bearer token.
///
/// A malformed token fails with `MalformedCredential`. An unknown or
/// already-revoked session succeeds without change.
pub async fn revoke_session(store: &dyn SessionStore, token: &str) -> Result<(), CoreError> {
    let id = parse_session_id(token)?;
    store.revoke(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use inventory_core::error::AuthFailure;
    use inventory_core::roles::Role;
    use inventory_core::store::memory::MemorySessionStore;
    use inventory_core::types::SessionId;
    use uuid::Uuid;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "user@test.com".to_string(),
            password_hash: String::new(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn issued_session_is_valid_with_role_snapshot() {
        let store = MemorySessionStore::new();
        let user = user(Role::Admin);

        let session = issue_session(&store, &user, Duration::hours(24))
            .await
            .unwrap();

        let stored = store.get_valid(session.id).await.unwrap().unwrap();
        assert_eq!(stored.user_id, user.id);
        assert_eq!(stored.role, Role::Admin);
        assert_eq!(stored.expired_at - stored.created_at, Duration::hours(24));
    }

    #[tokio::test]
    async fn revoke_session_invalidates_token() {
        let store = MemorySessionStore::new();
        let session = issue_session(&store, &user(Role::Staff), Duration::hours(24))
            .await
            .unwrap();

        revoke_session(&store, &session.id.to_string()).await.unwrap();
        assert!(store.get_valid(session.id).await.unwrap().is_none());

        // Second logout is a no-op.
        revoke_session(&store, &session.id.to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn revoke_session_rejects_malformed_token() {
        let store = MemorySessionStore::new();
        assert_matches!(
            revoke_session(&store, "garbage").await,
            Err(CoreError::Unauthenticated(AuthFailure::MalformedCredential))
        );
    }

    #[tokio::test]
    async fn revoke_unknown_token_succeeds() {
        let store = MemorySessionStore::new();
        revoke_session(&store, &Uuid::new_v4().to_string())
            .await
            .unwrap();
    }

    /// Store whose writes always fail.
    struct FailingStore;

    #[async_trait]
    impl SessionStore for FailingStore {
        async fn create(&self, _session: &Session) -> Result<(), CoreError> {
            Err(CoreError::Internal("disk full".to_string()))
        }

        async fn revoke(&self, _id: SessionId) -> Result<(), CoreError> {
            Err(CoreError::Internal("disk full".to_string()))
        }

        async fn get_valid(&self, _id: SessionId) -> Result<Option<Session>, CoreError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn failed_write_returns_error_not_session() {
        let result = issue_session(&FailingStore, &user(Role::Admin), Duration::hours(24)).await;
        assert_matches!(result, Err(CoreError::Internal(_)));
    }
}
