//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, RateLimiter};
use crate::services::{
    AuthService, IdentityService, ModerationService, RatingService, ServiceContainer, Services,
    TeacherService, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityService>,
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub teacher_service: Arc<dyn TeacherService>,
    pub rating_service: Arc<dyn RatingService>,
    pub moderation_service: Arc<dyn ModerationService>,
    /// Absent when no Redis URL is configured; every request then passes.
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(
        database: Arc<Database>,
        rate_limiter: Option<Arc<dyn RateLimiter>>,
        config: &Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, database, rate_limiter)
    }

    pub fn from_container(
        container: &impl ServiceContainer,
        database: Arc<Database>,
        rate_limiter: Option<Arc<dyn RateLimiter>>,
    ) -> Self {
        Self {
            identity: container.identity(),
            auth_service: container.auth(),
            user_service: container.users(),
            teacher_service: container.teachers(),
            rating_service: container.ratings(),
            moderation_service: container.moderation(),
            rate_limiter,
            database,
        }
    }
}
