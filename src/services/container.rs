//! Service Container - Centralized service access.
//!
//! Every service shares one `Persistence` unit of work and one identity
//! service built from the process configuration.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, IdentityService, JwtIdentity, ModerationService,
    ModerationWorkflow, RatingLedger, RatingService, TeacherDirectory, TeacherService,
    UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn identity(&self) -> Arc<dyn IdentityService>;

    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn teachers(&self) -> Arc<dyn TeacherService>;

    fn ratings(&self) -> Arc<dyn RatingService>;

    fn moderation(&self) -> Arc<dyn ModerationService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    identity: Arc<dyn IdentityService>,
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    teachers: Arc<dyn TeacherService>,
    ratings: Arc<dyn RatingService>,
    moderation: Arc<dyn ModerationService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let identity: Arc<dyn IdentityService> = Arc::new(JwtIdentity::new(config));

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), identity.clone())),
            users: Arc::new(UserManager::new(uow.clone())),
            teachers: Arc::new(TeacherDirectory::new(uow.clone())),
            ratings: Arc::new(RatingLedger::new(uow.clone())),
            moderation: Arc::new(ModerationWorkflow::new(uow)),
            identity,
        }
    }
}

impl ServiceContainer for Services {
    fn identity(&self) -> Arc<dyn IdentityService> {
        self.identity.clone()
    }

    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn teachers(&self) -> Arc<dyn TeacherService> {
        self.teachers.clone()
    }

    fn ratings(&self) -> Arc<dyn RatingService> {
        self.ratings.clone()
    }

    fn moderation(&self) -> Arc<dyn ModerationService> {
        self.moderation.clone()
    }
}
