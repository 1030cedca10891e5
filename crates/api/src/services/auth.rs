//! Credential verification for `POST /auth/login`.

use chrono::Duration;
use inventory_core::error::{AuthFailure, CoreError};
use inventory_core::session::Session;
use inventory_core::store::{SessionStore, UserStore};
use inventory_core::user::User;

use crate::auth::password::{verify_against_dummy, verify_password};
use crate::auth::session::issue_session;

/// A successful login: the issued session and the account it belongs to.
#[derive(Debug)]
pub struct LoginOutcome {
    pub session: Session,
    pub user: User,
}

/// Verify `email`/`password` and issue a session.
///
/// Unknown email and wrong password fail identically with
/// [`AuthFailure::InvalidCredentials`].
pub async fn login(
    users: &dyn UserStore,
    sessions: &dyn SessionStore,
    email: &str,
    password: &str,
    ttl: Duration,
) -> Result<LoginOutcome, CoreError> {
    tracing::info!(email, "Login attempt");

    let Some(user) = users.find_by_email(email).await? else {
        // Pay the same hashing cost as a wrong password.
        verify_against_dummy(password);
        tracing::warn!(email, "Login failed: unknown email");
        return Err(AuthFailure::InvalidCredentials.into());
    };

    if !verify_password(password, &user.password_hash) {
        tracing::warn!(email, user_id = %user.id, "Login failed: wrong password");
        return Err(AuthFailure::InvalidCredentials.into());
    }

    let session = issue_session(sessions, &user, ttl).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "Login succeeded");

    Ok(LoginOutcome { session, user })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use inventory_core::roles::Role;
    use inventory_core::store::memory::{MemorySessionStore, MemoryUserStore};
    use inventory_core::user::NewUser;

    use crate::auth::password::hash_password;

    async fn seeded() -> (MemoryUserStore, MemorySessionStore) {
        let users = MemoryUserStore::new();
        users
            .create(&NewUser {
                name: "Admin".into(),
                email: "admin@test.com".into(),
                password_hash: hash_password("password123").unwrap(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        (users, MemorySessionStore::new())
    }

    #[tokio::test]
    async fn valid_credentials_issue_a_session() {
        let (users, sessions) = seeded().await;

        let outcome = login(
            &users,
            &sessions,
            "admin@test.com",
            "password123",
            Duration::hours(24),
        )
        .await
        .unwrap();

        assert_eq!(outcome.user.email, "admin@test.com");
        assert_eq!(outcome.session.user_id, outcome.user.id);
        assert_eq!(outcome.session.role, Role::Admin);
        assert!(sessions
            .get_valid(outcome.session.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_alike() {
        let (users, sessions) = seeded().await;
        let ttl = Duration::hours(24);

        let wrong_password = login(&users, &sessions, "admin@test.com", "nope", ttl).await;
        let unknown_email = login(&users, &sessions, "ghost@test.com", "password123", ttl).await;

        assert_matches!(
            wrong_password,
            Err(CoreError::Unauthenticated(AuthFailure::InvalidCredentials))
        );
        assert_matches!(
            unknown_email,
            Err(CoreError::Unauthenticated(AuthFailure::InvalidCredentials))
        );
        assert!(sessions.is_empty().await, "failed logins must not write");
    }

    #[tokio::test]
    async fn each_login_gets_its_own_session() {
        let (users, sessions) = seeded().await;
        let ttl = Duration::hours(24);

        let a = login(&users, &sessions, "admin@test.com", "password123", ttl)
            .await
            .unwrap();
        let b = login(&users, &sessions, "admin@test.com", "password123", ttl)
            .await
            .unwrap();

        assert_ne!(a.session.id, b.session.id);
        assert_eq!(sessions.len().await, 2);
    }
}
