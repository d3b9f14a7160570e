//! User service - account administration.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{TransactionContext, UnitOfWork};

const USER_MISSING: &str = "用户不存在";

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// All users, newest first
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Ban or unban `target_id`. An admin cannot ban themselves.
    async fn toggle_active(&self, actor_id: Uuid, target_id: Uuid) -> AppResult<User>;

    /// Set the role of the user called `username`
    async fn set_role(&self, username: &str, role: UserRole) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn toggle_active(&self, actor_id: Uuid, target_id: Uuid) -> AppResult<User> {
        if actor_id == target_id {
            return Err(AppError::validation("You cannot ban yourself"));
        }

        let user: User = self
            .uow
            .transaction(move |ctx| Box::pin(flip_active(ctx, target_id)))
            .await?;

        tracing::info!(user_id = %user.id, active = user.is_active, "User status toggled");
        Ok(user)
    }

    async fn set_role(&self, username: &str, role: UserRole) -> AppResult<User> {
        let user = self
            .uow
            .users()
            .set_role(username, role)
            .await?
            .ok_or_not_found("User not found")?;

        tracing::info!(user_id = %user.id, role = %role, "User role changed");
        Ok(user)
    }
}

async fn flip_active(ctx: TransactionContext<'_>, id: Uuid) -> AppResult<User> {
    let users = ctx.users();
    if users.toggle_active(id).await? == 0 {
        return Err(AppError::not_found(USER_MISSING));
    }
    users.find_by_id(id).await?.ok_or_not_found(USER_MISSING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{test_user, TestUnitOfWork};

    #[tokio::test]
    async fn test_admin_cannot_ban_themselves() {
        let manager = UserManager::new(TestUnitOfWork::new().build());
        let me = Uuid::new_v4();

        let err = manager.toggle_active(me, me).await.unwrap_err();
        assert_eq!(err.to_string(), "You cannot ban yourself");
    }

    #[tokio::test]
    async fn test_set_role_unknown_username() {
        let mut uow = TestUnitOfWork::new();
        uow.users.expect_set_role().returning(|_, _| Ok(None));
        let manager = UserManager::new(uow.build());

        let err = manager.set_role("ghost", UserRole::Admin).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_role_promotes() {
        let mut uow = TestUnitOfWork::new();
        uow.users
            .expect_set_role()
            .withf(|name: &str, role: &UserRole| name == "alice" && *role == UserRole::Admin)
            .returning(|_, role| {
                Ok(Some(User {
                    role,
                    ..test_user(UserRole::User)
                }))
            });
        let manager = UserManager::new(uow.build());

        let user = manager.set_role("alice", UserRole::Admin).await.unwrap();
        assert!(user.is_admin());
    }
}
