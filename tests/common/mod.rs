//! Shared fixtures for integration tests.
//!
//! Every test gets its own in-memory SQLite database with migrations
//! applied. The pool holds a single connection so the database lives as
//! long as the fixture and concurrent transactions queue on it.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use sea_orm::ConnectOptions;

use teacher_ratings::api::{create_router, AppState};
use teacher_ratings::config::Config;
use teacher_ratings::domain::{Teacher, User, UserRole};
use teacher_ratings::infra::{Database, RateLimiter};
use teacher_ratings::services::container::{ServiceContainer, Services};
use teacher_ratings::services::NewAccount;

pub const TEST_SECRET: &str = "integration-test-secret-with-enough-length";
pub const TEST_PASSWORD: &str = "secret123";

pub struct TestContext {
    pub config: Config,
    pub database: Arc<Database>,
    pub services: Services,
}

impl TestContext {
    pub async fn new() -> Self {
        let config = Config::new("sqlite::memory:", TEST_SECRET);

        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let database = Database::connect_with(options)
            .await
            .expect("in-memory database should open");

        let services = Services::from_connection(database.get_connection(), &config);

        Self {
            config,
            database: Arc::new(database),
            services,
        }
    }

    /// Router with rate limiting disabled
    pub fn router(&self) -> Router {
        self.router_with_limiter(None)
    }

    pub fn router_with_limiter(&self, limiter: Option<Arc<dyn RateLimiter>>) -> Router {
        let state = AppState::from_container(&self.services, self.database.clone(), limiter);
        create_router(state, &self.config.allowed_origins)
    }

    pub async fn register(&self, username: &str) -> User {
        self.services
            .auth()
            .register(NewAccount {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: TEST_PASSWORD.to_string(),
            })
            .await
            .expect("registration should succeed")
    }

    pub async fn register_admin(&self, username: &str) -> User {
        self.register(username).await;
        self.services
            .users()
            .set_role(username, UserRole::Admin)
            .await
            .expect("promotion should succeed")
    }

    pub fn token_for(&self, user: &User) -> String {
        self.services
            .identity()
            .issue(user)
            .expect("token should be issued")
            .token
    }

    pub async fn teacher(&self, name: &str) -> Teacher {
        self.services
            .teachers()
            .create(Some(name.to_string()), Some("测试课程".to_string()))
            .await
            .expect("teacher should be created")
    }

    /// Reload a teacher including its aggregate columns
    pub async fn reload(&self, teacher: &Teacher) -> Teacher {
        self.services
            .teachers()
            .get(teacher.id)
            .await
            .expect("teacher should still exist")
    }
}
