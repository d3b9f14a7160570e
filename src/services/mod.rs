//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

pub mod access_policy;
mod auth_service;
pub mod container;
mod identity_service;
mod moderation_service;
mod rating_service;
mod teacher_service;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use access_policy::{require, AccessRule};
pub use auth_service::{
    AuthService, Authenticator, Credentials, NewAccount, ProfileUpdate, Session,
};
pub use identity_service::{Claims, IdentityService, IssuedToken, JwtIdentity};
pub use moderation_service::{DecisionOutcome, ModerationService, ModerationWorkflow};
pub use rating_service::{RatingLedger, RatingService, RatingSubmission};
pub use teacher_service::{TeacherDirectory, TeacherService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use identity_service::MockIdentityService;
