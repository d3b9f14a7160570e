//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod rating_repository;
mod submission_repository;
mod teacher_repository;
mod user_repository;

pub use rating_repository::{RatingRepository, RatingStore};
pub use submission_repository::{SubmissionRepository, SubmissionStore};
pub use teacher_repository::{TeacherRepository, TeacherStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use rating_repository::{find_rating, insert_rating};
pub(crate) use submission_repository::find_submission;
pub(crate) use teacher_repository::{find_teacher, insert_teacher};
pub(crate) use user_repository::find_user;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use rating_repository::MockRatingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use submission_repository::MockSubmissionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use teacher_repository::MockTeacherRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
