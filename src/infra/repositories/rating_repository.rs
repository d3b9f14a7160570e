//! Rating persistence.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::rating::{self, ActiveModel, Entity as RatingEntity};
use crate::domain::{NewRating, Rating};
use crate::errors::{AppError, AppResult};
use crate::types::{PageRequest, Paginated};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Rating repository trait for dependency injection.
///
/// Writes that touch a teacher's aggregate live on the transaction-scoped
/// repository instead.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Rating>>;

    /// The rating a user left for a teacher, if any
    async fn find_by_user_and_teacher(
        &self,
        user_id: Uuid,
        teacher_id: Uuid,
    ) -> AppResult<Option<Rating>>;

    /// Ratings of one teacher, newest first
    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Paginated<Rating>>;

    /// Ratings written by one user, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Rating>>;

    /// All ratings, newest first
    async fn list_all(&self, page: PageRequest) -> AppResult<Paginated<Rating>>;
}

/// Concrete implementation of RatingRepository
pub struct RatingStore {
    db: DatabaseConnection,
}

impl RatingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RatingRepository for RatingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Rating>> {
        find_rating(&self.db, id).await
    }

    async fn find_by_user_and_teacher(
        &self,
        user_id: Uuid,
        teacher_id: Uuid,
    ) -> AppResult<Option<Rating>> {
        let result = RatingEntity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::TeacherId.eq(teacher_id))
            .one(&self.db)
            .await?;

        Ok(result.map(Rating::from))
    }

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Paginated<Rating>> {
        let paginator = RatingEntity::find()
            .filter(rating::Column::TeacherId.eq(teacher_id))
            .order_by_desc(rating::Column::CreatedAt)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.index()).await?;

        Ok(Paginated::new(
            models.into_iter().map(Rating::from).collect(),
            page,
            total,
        ))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Rating>> {
        let models = RatingEntity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .order_by_desc(rating::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Rating::from).collect())
    }

    async fn list_all(&self, page: PageRequest) -> AppResult<Paginated<Rating>> {
        let paginator = RatingEntity::find()
            .order_by_desc(rating::Column::CreatedAt)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.index()).await?;

        Ok(Paginated::new(
            models.into_iter().map(Rating::from).collect(),
            page,
            total,
        ))
    }
}

pub(crate) async fn find_rating<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Rating>> {
    let result = RatingEntity::find_by_id(id).one(db).await?;
    Ok(result.map(Rating::from))
}

/// Insert a rating, translating constraint violations into ledger errors.
pub(crate) async fn insert_rating<C: ConnectionTrait>(db: &C, new: NewRating) -> AppResult<Rating> {
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        teacher_id: Set(new.teacher_id),
        user_id: Set(new.user_id),
        score: Set(new.score.value()),
        comment: Set(new.comment.into_inner()),
        is_anonymous: Set(new.is_anonymous),
        created_at: Set(Utc::now()),
    };

    let model = active_model.insert(db).await.map_err(|e| {
        if AppError::is_unique_violation(&e) {
            AppError::DuplicateRating
        } else if AppError::is_foreign_key_violation(&e) {
            AppError::TeacherNotFound
        } else {
            AppError::from(e)
        }
    })?;

    Ok(Rating::from(model))
}
