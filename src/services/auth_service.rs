//! Authentication service - registration, login and profile management.
//!
//! Login checks run in a fixed order: identifier, existence, password, ban.
//! Token signing is delegated to the IdentityService.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::identity_service::{IdentityService, IssuedToken};
use crate::domain::{Password, ProfileChanges, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

const USER_NOT_FOUND: &str = "User not found";

/// Fields of a new account, already shape-checked by the caller.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Credentials presented at login. Email takes precedence over username.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Requested profile changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct Session {
    pub token: IssuedToken,
    pub user: User,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user with the `user` role
    async fn register(&self, account: NewAccount) -> AppResult<User>;

    /// Check credentials and issue a token
    async fn login(&self, credentials: Credentials) -> AppResult<Session>;

    /// Current state of the caller's account
    async fn profile(&self, user_id: Uuid) -> AppResult<User>;

    async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    identity: Arc<dyn IdentityService>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, identity: Arc<dyn IdentityService>) -> Self {
        Self { uow, identity }
    }

    async fn find_by_identifier(&self, credentials: &Credentials) -> AppResult<Option<User>> {
        let users = self.uow.users();
        match (non_blank(&credentials.email), non_blank(&credentials.username)) {
            (Some(email), _) => users.find_by_email(email).await,
            (None, Some(username)) => users.find_by_username(username).await,
            (None, None) => Err(AppError::MissingIdentifier),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, account: NewAccount) -> AppResult<User> {
        let users = self.uow.users();

        if users.find_by_email(&account.email).await?.is_some() {
            return Err(AppError::conflict("User with this email already exists."));
        }
        if users.find_by_username(&account.username).await?.is_some() {
            return Err(AppError::conflict("User with this username already exists."));
        }

        let password_hash = Password::new(&account.password)?.into_string();
        let user = users
            .create(account.username, account.email, password_hash)
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    async fn login(&self, credentials: Credentials) -> AppResult<Session> {
        let user = self
            .find_by_identifier(&credentials)
            .await?
            .ok_or(AppError::UnknownUser)?;

        let password = credentials.password.as_deref().unwrap_or_default();
        if !Password::from_hash(user.password_hash.clone()).verify(password) {
            tracing::warn!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::WrongPassword);
        }

        if user.is_banned() {
            tracing::warn!(user_id = %user.id, "Login attempt by banned user");
            return Err(AppError::UserBanned);
        }

        let token = self.identity.issue(&user)?;
        Ok(Session { token, user })
    }

    async fn profile(&self, user_id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found(USER_NOT_FOUND)
    }

    async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let users = self.uow.users();
        let user = users
            .find_by_id(user_id)
            .await?
            .ok_or_not_found(USER_NOT_FOUND)?;

        let mut changes = ProfileChanges::default();

        if let Some(email) = update.email.filter(|e| !e.is_empty() && *e != user.email) {
            if users.find_by_email(&email).await?.is_some() {
                return Err(AppError::validation("Email already in use"));
            }
            changes.email = Some(email);
        }
        if let Some(password) = update.password.filter(|p| !p.is_empty()) {
            changes.password_hash = Some(Password::new(&password)?.into_string());
        }
        changes.first_name = update.first_name.map(|n| n.trim().to_string());
        changes.last_name = update.last_name.map(|n| n.trim().to_string());

        users.update_profile(user_id, changes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::services::identity_service::MockIdentityService;
    use crate::services::test_support::{test_user, TestUnitOfWork};

    fn hashed_user(password: &str, active: bool) -> User {
        User {
            password_hash: Password::new(password).unwrap().into_string(),
            is_active: active,
            ..test_user(UserRole::User)
        }
    }

    fn identity_issuing() -> Arc<dyn IdentityService> {
        let mut identity = MockIdentityService::new();
        identity.expect_issue().returning(|_| {
            Ok(IssuedToken {
                token: "signed".to_string(),
                expires_in: 43200,
            })
        });
        Arc::new(identity)
    }

    fn identity_unused() -> Arc<dyn IdentityService> {
        let mut identity = MockIdentityService::new();
        identity.expect_issue().never();
        Arc::new(identity)
    }

    fn by_email(email: &str, password: &str) -> Credentials {
        Credentials {
            email: Some(email.to_string()),
            username: None,
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_requires_identifier() {
        let auth = Authenticator::new(TestUnitOfWork::new().build(), identity_unused());

        let err = auth
            .login(Credentials {
                email: Some(String::new()),
                username: None,
                password: Some("secret1".to_string()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MissingIdentifier));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let mut uow = TestUnitOfWork::new();
        uow.users.expect_find_by_email().returning(|_| Ok(None));
        let auth = Authenticator::new(uow.build(), identity_unused());

        let err = auth.login(by_email("ghost@example.com", "secret1")).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownUser));
    }

    #[tokio::test]
    async fn test_login_wrong_password_checked_before_ban() {
        let mut uow = TestUnitOfWork::new();
        uow.users
            .expect_find_by_email()
            .returning(|_| Ok(Some(hashed_user("secret1", false))));
        let auth = Authenticator::new(uow.build(), identity_unused());

        let err = auth.login(by_email("alice@example.com", "wrong!!")).await.unwrap_err();
        assert!(matches!(err, AppError::WrongPassword));
    }

    #[tokio::test]
    async fn test_login_banned_user_gets_no_token() {
        let mut uow = TestUnitOfWork::new();
        uow.users
            .expect_find_by_email()
            .returning(|_| Ok(Some(hashed_user("secret1", false))));
        let auth = Authenticator::new(uow.build(), identity_unused());

        let err = auth.login(by_email("alice@example.com", "secret1")).await.unwrap_err();
        assert!(matches!(err, AppError::UserBanned));
    }

    #[tokio::test]
    async fn test_login_by_username() {
        let mut uow = TestUnitOfWork::new();
        uow.users.expect_find_by_email().never();
        uow.users
            .expect_find_by_username()
            .withf(|name: &str| name == "alice")
            .returning(|_| Ok(Some(hashed_user("secret1", true))));
        let auth = Authenticator::new(uow.build(), identity_issuing());

        let session = auth
            .login(Credentials {
                email: None,
                username: Some("alice".to_string()),
                password: Some("secret1".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(session.token.token, "signed");
        assert_eq!(session.user.username, "alice");
    }

    #[tokio::test]
    async fn test_register_reports_taken_email_first() {
        let mut uow = TestUnitOfWork::new();
        uow.users
            .expect_find_by_email()
            .returning(|_| Ok(Some(test_user(UserRole::User))));
        uow.users.expect_create().never();
        let auth = Authenticator::new(uow.build(), identity_unused());

        let err = auth
            .register(NewAccount {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "User with this email already exists.");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_email() {
        let me = test_user(UserRole::User);
        let my_id = me.id;
        let mut uow = TestUnitOfWork::new();
        uow.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(me.clone())));
        uow.users
            .expect_find_by_email()
            .returning(|_| Ok(Some(test_user(UserRole::User))));
        uow.users.expect_update_profile().never();
        let auth = Authenticator::new(uow.build(), identity_unused());

        let err = auth
            .update_profile(
                my_id,
                ProfileUpdate {
                    email: Some("taken@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Email already in use");
    }
}
