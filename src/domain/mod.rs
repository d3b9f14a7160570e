//! Domain layer - Core business entities and value objects
//!
//! Independent of persistence and transport; only depends on error types.

pub mod password;
pub mod rating;
pub mod submission;
pub mod teacher;
pub mod user;

pub use password::Password;
pub use rating::{Comment, NewRating, Rating, RatingView, Score};
pub use submission::{Decision, Submission, SubmissionStatus};
pub use teacher::{Teacher, TeacherDetail, TeacherName, TeacherSummary};
pub use user::{Profile, ProfileChanges, User, UserResponse, UserRole};
