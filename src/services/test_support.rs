//! Shared fixtures for service unit tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Profile, Rating, Submission, SubmissionStatus, Teacher, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    MockRatingRepository, MockSubmissionRepository, MockTeacherRepository, MockUserRepository,
    RatingRepository, SubmissionRepository, TeacherRepository, TransactionContext, TxFuture,
    UnitOfWork, UserRepository,
};

/// UnitOfWork around repository mocks. Transactions are refused, so any
/// test reaching one observes an internal error.
#[derive(Default)]
pub struct TestUnitOfWork {
    pub users: MockUserRepository,
    pub teachers: MockTeacherRepository,
    pub ratings: MockRatingRepository,
    pub submissions: MockSubmissionRepository,
}

impl TestUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> Arc<FrozenUnitOfWork> {
        Arc::new(FrozenUnitOfWork {
            users: Arc::new(self.users),
            teachers: Arc::new(self.teachers),
            ratings: Arc::new(self.ratings),
            submissions: Arc::new(self.submissions),
        })
    }
}

/// TestUnitOfWork after expectations have been set.
pub struct FrozenUnitOfWork {
    users: Arc<MockUserRepository>,
    teachers: Arc<MockTeacherRepository>,
    ratings: Arc<MockRatingRepository>,
    submissions: Arc<MockSubmissionRepository>,
}

#[async_trait]
impl UnitOfWork for FrozenUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn teachers(&self) -> Arc<dyn TeacherRepository> {
        self.teachers.clone()
    }

    fn ratings(&self) -> Arc<dyn RatingRepository> {
        self.ratings.clone()
    }

    fn submissions(&self) -> Arc<dyn SubmissionRepository> {
        self.submissions.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

pub fn test_user(role: UserRole) -> User {
    User {
        id: Uuid::new_v4(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password_hash: "hashed".to_string(),
        role,
        is_active: true,
        profile: Profile::default(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_teacher(id: Uuid, active: bool) -> Teacher {
    Teacher {
        id,
        name: "王老师".to_string(),
        description: String::new(),
        is_active: active,
        rating_count: 0,
        rating_sum: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_rating(teacher_id: Uuid, user_id: Uuid, anonymous: bool) -> Rating {
    Rating {
        id: Uuid::new_v4(),
        teacher_id,
        user_id,
        score: 4,
        comment: "clear explanations".to_string(),
        is_anonymous: anonymous,
        created_at: Utc::now(),
    }
}

pub fn test_submission(status: SubmissionStatus) -> Submission {
    Submission {
        id: Uuid::new_v4(),
        name: "李老师".to_string(),
        description: String::new(),
        submitted_by: Uuid::new_v4(),
        status,
        admin_note: String::new(),
        processed_at: None,
        created_at: Utc::now(),
    }
}
