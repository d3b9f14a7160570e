//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and runs multi-statement writes inside a
//! single database transaction: committed when the closure succeeds, rolled
//! back on any error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, AccessMode, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, QueryFilter, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{rating, submission, teacher, user};
use super::repositories::{
    find_rating, find_submission, find_teacher, find_user, insert_rating, insert_teacher,
    RatingRepository, RatingStore, SubmissionRepository, SubmissionStore, TeacherRepository,
    TeacherStore, UserRepository, UserStore,
};
use crate::domain::{NewRating, Rating, Submission, SubmissionStatus, Teacher, User};
use crate::errors::AppResult;

/// Boxed future returned by transaction closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method;
/// tests provide a hand-written implementation around repository mocks.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn teachers(&self) -> Arc<dyn TeacherRepository>;

    fn ratings(&self) -> Arc<dyn RatingRepository>;

    fn submissions(&self) -> Arc<dyn SubmissionRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access scoped to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn teachers(&self) -> TxTeacherRepository<'_> {
        TxTeacherRepository { txn: self.txn }
    }

    pub fn ratings(&self) -> TxRatingRepository<'_> {
        TxRatingRepository { txn: self.txn }
    }

    pub fn submissions(&self) -> TxSubmissionRepository<'_> {
        TxSubmissionRepository { txn: self.txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    teacher_repo: Arc<TeacherStore>,
    rating_repo: Arc<RatingStore>,
    submission_repo: Arc<SubmissionStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            teacher_repo: Arc::new(TeacherStore::new(db.clone())),
            rating_repo: Arc::new(RatingStore::new(db.clone())),
            submission_repo: Arc::new(SubmissionStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn teachers(&self) -> Arc<dyn TeacherRepository> {
        self.teacher_repo.clone()
    }

    fn ratings(&self) -> Arc<dyn RatingRepository> {
        self.rating_repo.clone()
    }

    fn submissions(&self) -> Arc<dyn SubmissionRepository> {
        self.submission_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await?;

        let outcome = f(TransactionContext::new(&txn)).await;

        match outcome {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware teacher repository.
///
/// Aggregate changes are single `UPDATE` statements evaluated by the
/// database, so concurrent writers never lose an increment.
pub struct TxTeacherRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxTeacherRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Teacher>> {
        find_teacher(self.txn, id).await
    }

    pub async fn create(&self, name: String, description: String) -> AppResult<Teacher> {
        insert_teacher(self.txn, name, description).await
    }

    /// Add one rating of `score` to the aggregate. Returns rows affected.
    pub async fn credit(&self, id: Uuid, score: i32) -> AppResult<u64> {
        let result = teacher::Entity::update_many()
            .col_expr(
                teacher::Column::RatingCount,
                Expr::col(teacher::Column::RatingCount).add(1),
            )
            .col_expr(
                teacher::Column::RatingSum,
                Expr::col(teacher::Column::RatingSum).add(i64::from(score)),
            )
            .filter(teacher::Column::Id.eq(id))
            .exec(self.txn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Remove one rating of `score` from the aggregate, flooring both
    /// columns at zero. Returns rows affected.
    pub async fn debit(&self, id: Uuid, score: i32) -> AppResult<u64> {
        let score = i64::from(score);
        let result = teacher::Entity::update_many()
            .col_expr(
                teacher::Column::RatingCount,
                Expr::case(
                    Expr::col(teacher::Column::RatingCount).gte(1),
                    Expr::col(teacher::Column::RatingCount).sub(1),
                )
                .finally(0)
                .into(),
            )
            .col_expr(
                teacher::Column::RatingSum,
                Expr::case(
                    Expr::col(teacher::Column::RatingSum).gte(score),
                    Expr::col(teacher::Column::RatingSum).sub(score),
                )
                .finally(0)
                .into(),
            )
            .filter(teacher::Column::Id.eq(id))
            .exec(self.txn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Delete the teacher row. Returns rows affected.
    pub async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = teacher::Entity::delete_by_id(id).exec(self.txn).await?;
        Ok(result.rows_affected)
    }
}

/// Transaction-aware rating repository.
pub struct TxRatingRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxRatingRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Rating>> {
        find_rating(self.txn, id).await
    }

    /// Insert a rating; the (user, teacher) unique index rejects duplicates.
    pub async fn insert(&self, new: NewRating) -> AppResult<Rating> {
        insert_rating(self.txn, new).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = rating::Entity::delete_by_id(id).exec(self.txn).await?;
        Ok(result.rows_affected)
    }

    /// Delete every rating of a teacher. Returns rows affected.
    pub async fn delete_for_teacher(&self, teacher_id: Uuid) -> AppResult<u64> {
        let result = rating::Entity::delete_many()
            .filter(rating::Column::TeacherId.eq(teacher_id))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected)
    }
}

/// Transaction-aware submission repository.
pub struct TxSubmissionRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxSubmissionRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Submission>> {
        find_submission(self.txn, id).await
    }

    /// Move a pending submission to a terminal status.
    ///
    /// Conditional on the current status being `pending`; returns the number
    /// of rows changed (0 or 1).
    pub async fn transition(
        &self,
        id: Uuid,
        to: SubmissionStatus,
        admin_note: String,
        processed_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = submission::Entity::update_many()
            .col_expr(submission::Column::Status, Expr::value(to.as_str()))
            .col_expr(submission::Column::AdminNote, Expr::value(admin_note))
            .col_expr(
                submission::Column::ProcessedAt,
                Expr::value(Some(processed_at)),
            )
            .filter(submission::Column::Id.eq(id))
            .filter(submission::Column::Status.eq(SubmissionStatus::Pending.as_str()))
            .exec(self.txn)
            .await?;

        Ok(result.rows_affected)
    }
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_user(self.txn, id).await
    }

    /// Flip `is_active` in place. Returns rows affected.
    pub async fn toggle_active(&self, id: Uuid) -> AppResult<u64> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::IsActive, Expr::col(user::Column::IsActive).not())
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(self.txn)
            .await?;
        Ok(result.rows_affected)
    }
}
