//! User management operations.
//!
//! Each mutating operation re-reads the target from the store and runs the
//! hierarchy policy against that fresh copy. The requester's role comes from
//! the session snapshot attached by the authentication gate.

use inventory_core::error::CoreError;
use inventory_core::hierarchy::{check_user_mutation, UserMutation};
use inventory_core::pagination::{PageInfo, PageRequest};
use inventory_core::roles::Role;
use inventory_core::session::Identity;
use inventory_core::store::UserStore;
use inventory_core::types::DbId;
use inventory_core::user::{NewUser, User, UserChanges, UserQuery};

use crate::auth::password::hash_password;

const ENTITY: &str = "User";

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: ENTITY, id }
}

/// Validated input for [`create_user`]; the password is still plaintext.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub async fn create_user(
    users: &dyn UserStore,
    requester: &Identity,
    input: CreateUser,
) -> Result<User, CoreError> {
    check_user_mutation(requester.role, UserMutation::Create { role: input.role })?;

    let password_hash = hash_password(&input.password).map_err(|e| {
        CoreError::Internal(format!("Password hashing failed: {e}"))
    })?;

    let user = users
        .create(&NewUser {
            name: input.name,
            email: input.email,
            password_hash,
            role: input.role,
        })
        .await?;

    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        created_by = %requester.user_id,
        "User created"
    );
    Ok(user)
}

pub async fn list_users(
    users: &dyn UserStore,
    search: Option<String>,
    page: PageRequest,
) -> Result<(Vec<User>, PageInfo), CoreError> {
    let query = UserQuery {
        search: search.map(|s| s.trim().to_string()).unwrap_or_default(),
        page,
    };
    let total = users.count(&query.search).await?;
    let items = users.list(&query).await?;
    Ok((items, PageInfo::new(page, total)))
}

pub async fn get_user(users: &dyn UserStore, id: DbId) -> Result<User, CoreError> {
    users.find_by_id(id).await?.ok_or_else(|| not_found(id))
}

pub async fn update_user(
    users: &dyn UserStore,
    requester: &Identity,
    id: DbId,
    changes: UserChanges,
) -> Result<User, CoreError> {
    let target = get_user(users, id).await?;
    check_user_mutation(
        requester.role,
        UserMutation::Update {
            current: target.role,
            requested: changes.role,
        },
    )?;

    // The row can disappear between the read and the write.
    let user = users
        .update(id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        updated_by = %requester.user_id,
        "User updated"
    );
    Ok(user)
}

/// Soft-delete a user. Sessions already issued to it are left alone.
pub async fn delete_user(
    users: &dyn UserStore,
    requester: &Identity,
    id: DbId,
) -> Result<(), CoreError> {
    let target = get_user(users, id).await?;
    check_user_mutation(
        requester.role,
        UserMutation::Delete {
            current: target.role,
        },
    )?;

    if !users.soft_delete(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(user_id = %id, deleted_by = %requester.user_id, "User deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use inventory_core::store::memory::MemoryUserStore;
    use uuid::Uuid;

    fn requester(role: Role) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    fn input(email: &str, role: Role) -> CreateUser {
        CreateUser {
            name: "Some User".into(),
            email: email.into(),
            password: "password123".into(),
            role,
        }
    }

    async fn existing(users: &MemoryUserStore, email: &str, role: Role) -> User {
        create_user(users, &requester(Role::SuperAdmin), input(email, role))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_hashes_password() {
        let users = MemoryUserStore::new();
        let user = existing(&users, "a@test.com", Role::Staff).await;
        assert_ne!(user.password_hash, "password123");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn admin_cannot_create_super_admin() {
        let users = MemoryUserStore::new();
        let result = create_user(
            &users,
            &requester(Role::Admin),
            input("x@test.com", Role::SuperAdmin),
        )
        .await;
        assert_matches!(
            result,
            Err(CoreError::Forbidden(msg)) if msg == "forbidden: admin cannot create a super_admin"
        );
        assert_eq!(users.count("").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn admin_creates_staff() {
        let users = MemoryUserStore::new();
        let user = create_user(
            &users,
            &requester(Role::Admin),
            input("s@test.com", Role::Staff),
        )
        .await
        .unwrap();
        assert_eq!(user.role, Role::Staff);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let users = MemoryUserStore::new();
        existing(&users, "dup@test.com", Role::Staff).await;
        let result = create_user(
            &users,
            &requester(Role::SuperAdmin),
            input("dup@test.com", Role::Admin),
        )
        .await;
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn admin_cannot_promote_to_super_admin() {
        let users = MemoryUserStore::new();
        let target = existing(&users, "t@test.com", Role::Staff).await;

        let result = update_user(
            &users,
            &requester(Role::Admin),
            target.id,
            UserChanges {
                name: None,
                role: Some(Role::SuperAdmin),
            },
        )
        .await;
        assert_matches!(
            result,
            Err(CoreError::Forbidden(msg)) if msg == "forbidden: admin cannot promote a user to super_admin"
        );
        assert_eq!(get_user(&users, target.id).await.unwrap().role, Role::Staff);
    }

    #[tokio::test]
    async fn admin_cannot_rename_super_admin() {
        let users = MemoryUserStore::new();
        let target = existing(&users, "root@test.com", Role::SuperAdmin).await;

        let result = update_user(
            &users,
            &requester(Role::Admin),
            target.id,
            UserChanges {
                name: Some("Renamed".into()),
                role: None,
            },
        )
        .await;
        assert_matches!(
            result,
            Err(CoreError::Forbidden(msg)) if msg == "forbidden: admin cannot modify a super_admin"
        );
    }

    #[tokio::test]
    async fn admin_updates_admin() {
        let users = MemoryUserStore::new();
        let target = existing(&users, "peer@test.com", Role::Admin).await;

        let updated = update_user(
            &users,
            &requester(Role::Admin),
            target.id,
            UserChanges {
                name: Some("Peer Renamed".into()),
                role: Some(Role::Staff),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Peer Renamed");
        assert_eq!(updated.role, Role::Staff);
    }

    #[tokio::test]
    async fn super_admin_can_demote_super_admin() {
        let users = MemoryUserStore::new();
        let target = existing(&users, "root@test.com", Role::SuperAdmin).await;

        let updated = update_user(
            &users,
            &requester(Role::SuperAdmin),
            target.id,
            UserChanges {
                name: None,
                role: Some(Role::Admin),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.role, Role::Admin);
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let users = MemoryUserStore::new();
        let id = Uuid::new_v4();
        let result = update_user(
            &users,
            &requester(Role::SuperAdmin),
            id,
            UserChanges::default(),
        )
        .await;
        assert_matches!(result, Err(CoreError::NotFound { entity: "User", id: got }) if got == id);
    }

    #[tokio::test]
    async fn admin_cannot_delete_super_admin() {
        let users = MemoryUserStore::new();
        let target = existing(&users, "root@test.com", Role::SuperAdmin).await;

        let result = delete_user(&users, &requester(Role::Admin), target.id).await;
        assert_matches!(
            result,
            Err(CoreError::Forbidden(msg)) if msg == "forbidden: admin cannot delete a super_admin"
        );
        assert!(get_user(&users, target.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_hides_user_and_second_delete_is_not_found() {
        let users = MemoryUserStore::new();
        let target = existing(&users, "gone@test.com", Role::Staff).await;
        let admin = requester(Role::Admin);

        delete_user(&users, &admin, target.id).await.unwrap();
        assert_matches!(
            get_user(&users, target.id).await,
            Err(CoreError::NotFound { .. })
        );
        assert_matches!(
            delete_user(&users, &admin, target.id).await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn staff_is_rejected_by_policy() {
        let users = MemoryUserStore::new();
        let target = existing(&users, "t@test.com", Role::Staff).await;

        assert_matches!(
            delete_user(&users, &requester(Role::Staff), target.id).await,
            Err(CoreError::Forbidden(msg)) if msg == "forbidden: staff cannot manage users"
        );
    }

    #[tokio::test]
    async fn list_reports_pagination() {
        let users = MemoryUserStore::new();
        for i in 0..5 {
            existing(&users, &format!("u{i}@test.com"), Role::Staff).await;
        }

        let (items, info) = list_users(&users, None, PageRequest::new(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            info,
            PageInfo {
                page: 2,
                limit: 2,
                total_items: 5,
                total_pages: 3,
            }
        );

        let (items, info) = list_users(&users, Some("U4@".into()), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(info.total_pages, 1);
    }
}
