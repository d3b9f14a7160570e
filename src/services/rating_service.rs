//! Rating ledger - owns rating records and each teacher's aggregate.
//!
//! A rating insert and the matching aggregate credit commit together, as do
//! a rating delete and its debit. Uniqueness of (user, teacher) is enforced
//! by the store; the lookup in `submit` only produces the friendly error
//! early.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Comment, NewRating, Rating, RatingView, Score};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{TransactionContext, UnitOfWork};
use crate::types::{PageRequest, Paginated};

const RATING_NOT_FOUND: &str = "评价不存在";
const TEACHER_NOT_FOUND: &str = "Teacher not found";

/// Raw rating input as received from a client.
#[derive(Debug, Clone, Default)]
pub struct RatingSubmission {
    pub teacher_id: Option<String>,
    pub score: Option<Value>,
    pub comment: Option<String>,
    pub is_anonymous: bool,
}

/// Rating service trait for dependency injection.
#[async_trait]
pub trait RatingService: Send + Sync {
    /// Validate and record a rating by `actor_id`, crediting the teacher.
    async fn submit(&self, actor_id: Uuid, input: RatingSubmission) -> AppResult<Rating>;

    /// Public ratings of a teacher, newest first
    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Paginated<RatingView>>;

    /// Ratings written by `actor_id`, newest first
    async fn list_for_user(&self, actor_id: Uuid) -> AppResult<Vec<RatingView>>;

    /// Every rating, newest first
    async fn list_all(&self, page: PageRequest) -> AppResult<Paginated<RatingView>>;

    /// Delete a rating and debit its teacher.
    async fn remove(&self, rating_id: Uuid) -> AppResult<Rating>;
}

/// Concrete implementation of RatingService using Unit of Work.
pub struct RatingLedger<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RatingLedger<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> RatingService for RatingLedger<U> {
    async fn submit(&self, actor_id: Uuid, input: RatingSubmission) -> AppResult<Rating> {
        let teacher_id = input
            .teacher_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or(AppError::InvalidReference("teacherId"))?;

        let teacher = self
            .uow
            .teachers()
            .find_by_id(teacher_id)
            .await?
            .ok_or(AppError::TeacherNotFound)?;
        if !teacher.is_active {
            return Err(AppError::TeacherInactive);
        }

        let score = Score::from_json(input.score.as_ref())?;

        if self
            .uow
            .ratings()
            .find_by_user_and_teacher(actor_id, teacher_id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateRating);
        }

        let comment = Comment::parse(input.comment.as_deref())?;

        let new = NewRating {
            teacher_id,
            user_id: actor_id,
            score,
            comment,
            is_anonymous: input.is_anonymous,
        };
        let rating: Rating = self
            .uow
            .transaction(move |ctx| Box::pin(record_rating(ctx, new)))
            .await?;

        tracing::info!(
            rating_id = %rating.id,
            teacher_id = %rating.teacher_id,
            user_id = %rating.user_id,
            score = rating.score,
            "Rating accepted"
        );
        Ok(rating)
    }

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Paginated<RatingView>> {
        self.uow
            .teachers()
            .find_by_id(teacher_id)
            .await?
            .ok_or_not_found(TEACHER_NOT_FOUND)?;

        let ratings = self.uow.ratings().list_for_teacher(teacher_id, page).await?;
        Ok(ratings.map(RatingView::public))
    }

    async fn list_for_user(&self, actor_id: Uuid) -> AppResult<Vec<RatingView>> {
        let ratings = self.uow.ratings().list_for_user(actor_id).await?;
        Ok(ratings.into_iter().map(RatingView::full).collect())
    }

    async fn list_all(&self, page: PageRequest) -> AppResult<Paginated<RatingView>> {
        let ratings = self.uow.ratings().list_all(page).await?;
        Ok(ratings.map(RatingView::full))
    }

    async fn remove(&self, rating_id: Uuid) -> AppResult<Rating> {
        let rating: Rating = self
            .uow
            .transaction(move |ctx| Box::pin(retract_rating(ctx, rating_id)))
            .await?;

        tracing::info!(
            rating_id = %rating.id,
            teacher_id = %rating.teacher_id,
            score = rating.score,
            "Rating removed"
        );
        Ok(rating)
    }
}

/// Insert the rating and credit its teacher in one transaction.
async fn record_rating(ctx: TransactionContext<'_>, new: NewRating) -> AppResult<Rating> {
    let teacher_id = new.teacher_id;
    let score = new.score.value();

    let rating = ctx.ratings().insert(new).await?;
    if ctx.teachers().credit(teacher_id, score).await? == 0 {
        return Err(AppError::TeacherNotFound);
    }

    Ok(rating)
}

/// Delete the rating and debit its teacher in one transaction.
///
/// A concurrent removal of the same rating deletes zero rows here and
/// fails before the aggregate is touched.
async fn retract_rating(ctx: TransactionContext<'_>, rating_id: Uuid) -> AppResult<Rating> {
    let ratings = ctx.ratings();
    let rating = ratings
        .find_by_id(rating_id)
        .await?
        .ok_or_not_found(RATING_NOT_FOUND)?;

    if ratings.delete(rating.id).await? == 0 {
        return Err(AppError::not_found(RATING_NOT_FOUND));
    }
    if ctx.teachers().debit(rating.teacher_id, rating.score).await? == 0 {
        tracing::warn!(teacher_id = %rating.teacher_id, "Removed rating had no teacher to debit");
    }

    Ok(rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{test_rating, test_teacher, TestUnitOfWork};
    use mockall::predicate::eq;
    use serde_json::json;

    fn submission(teacher_id: &str, score: Value, comment: &str) -> RatingSubmission {
        RatingSubmission {
            teacher_id: Some(teacher_id.to_string()),
            score: Some(score),
            comment: Some(comment.to_string()),
            is_anonymous: false,
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_malformed_teacher_id() {
        let ledger = RatingLedger::new(TestUnitOfWork::new().build());

        let err = ledger
            .submit(Uuid::new_v4(), submission("not-a-uuid", json!(5), "great teacher!"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidReference("teacherId")));
    }

    #[tokio::test]
    async fn test_submit_unknown_teacher() {
        let mut uow = TestUnitOfWork::new();
        uow.teachers.expect_find_by_id().returning(|_| Ok(None));
        let ledger = RatingLedger::new(uow.build());

        let err = ledger
            .submit(Uuid::new_v4(), submission(&Uuid::new_v4().to_string(), json!(5), "great teacher!"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::TeacherNotFound));
    }

    #[tokio::test]
    async fn test_submit_inactive_teacher_checked_before_score() {
        let teacher_id = Uuid::new_v4();
        let mut uow = TestUnitOfWork::new();
        uow.teachers
            .expect_find_by_id()
            .with(eq(teacher_id))
            .returning(|id| Ok(Some(test_teacher(id, false))));
        let ledger = RatingLedger::new(uow.build());

        let err = ledger
            .submit(Uuid::new_v4(), submission(&teacher_id.to_string(), json!(9), "short"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::TeacherInactive));
    }

    #[tokio::test]
    async fn test_submit_invalid_score_checked_before_duplicate() {
        let teacher_id = Uuid::new_v4();
        let mut uow = TestUnitOfWork::new();
        uow.teachers
            .expect_find_by_id()
            .returning(|id| Ok(Some(test_teacher(id, true))));
        uow.ratings.expect_find_by_user_and_teacher().never();
        let ledger = RatingLedger::new(uow.build());

        for score in [json!(0), json!(6), json!(4.5), json!("5")] {
            let err = ledger
                .submit(Uuid::new_v4(), submission(&teacher_id.to_string(), score, "great teacher!"))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidScore));
        }
    }

    #[tokio::test]
    async fn test_submit_duplicate_wins_over_bad_comment() {
        let teacher_id = Uuid::new_v4();
        let actor_id = Uuid::new_v4();
        let mut uow = TestUnitOfWork::new();
        uow.teachers
            .expect_find_by_id()
            .returning(|id| Ok(Some(test_teacher(id, true))));
        uow.ratings
            .expect_find_by_user_and_teacher()
            .with(eq(actor_id), eq(teacher_id))
            .returning(|user, teacher| Ok(Some(test_rating(teacher, user, false))));
        let ledger = RatingLedger::new(uow.build());

        let err = ledger
            .submit(actor_id, submission(&teacher_id.to_string(), json!(3), "meh"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateRating));
    }

    #[tokio::test]
    async fn test_submit_short_comment() {
        let teacher_id = Uuid::new_v4();
        let mut uow = TestUnitOfWork::new();
        uow.teachers
            .expect_find_by_id()
            .returning(|id| Ok(Some(test_teacher(id, true))));
        uow.ratings
            .expect_find_by_user_and_teacher()
            .returning(|_, _| Ok(None));
        let ledger = RatingLedger::new(uow.build());

        let err = ledger
            .submit(Uuid::new_v4(), submission(&teacher_id.to_string(), json!(5), "123456789"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CommentTooShort));
    }

    #[tokio::test]
    async fn test_list_for_teacher_hides_anonymous_authors() {
        let teacher_id = Uuid::new_v4();
        let mut uow = TestUnitOfWork::new();
        uow.teachers
            .expect_find_by_id()
            .returning(|id| Ok(Some(test_teacher(id, true))));
        uow.ratings
            .expect_list_for_teacher()
            .returning(|teacher_id, page| {
                let items = vec![
                    test_rating(teacher_id, Uuid::new_v4(), true),
                    test_rating(teacher_id, Uuid::new_v4(), false),
                ];
                Ok(Paginated::new(items, page, 2))
            });
        let ledger = RatingLedger::new(uow.build());

        let page = ledger
            .list_for_teacher(teacher_id, PageRequest::new(1, 10))
            .await
            .unwrap();

        assert_eq!(page.meta.total, 2);
        assert!(page.items[0].user_id.is_none());
        assert!(page.items[1].user_id.is_some());
    }

    #[tokio::test]
    async fn test_list_for_unknown_teacher() {
        let mut uow = TestUnitOfWork::new();
        uow.teachers.expect_find_by_id().returning(|_| Ok(None));
        uow.ratings.expect_list_for_teacher().never();
        let ledger = RatingLedger::new(uow.build());

        let err = ledger
            .list_for_teacher(Uuid::new_v4(), PageRequest::new(1, 10))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref m) if m == "Teacher not found"));
    }
}
