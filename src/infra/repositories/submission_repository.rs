//! Submission persistence.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::submission::{self, ActiveModel, Entity as SubmissionEntity};
use crate::domain::{Submission, SubmissionStatus};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Submission repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Submission>>;

    /// Record a new pending submission
    async fn create(
        &self,
        name: String,
        description: String,
        submitted_by: Uuid,
    ) -> AppResult<Submission>;

    /// Submissions of one user, newest first
    async fn list_by_submitter(&self, user_id: Uuid) -> AppResult<Vec<Submission>>;

    /// Pending submissions, newest first
    async fn list_pending(&self) -> AppResult<Vec<Submission>>;
}

/// Concrete implementation of SubmissionRepository
pub struct SubmissionStore {
    db: DatabaseConnection,
}

impl SubmissionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubmissionRepository for SubmissionStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Submission>> {
        find_submission(&self.db, id).await
    }

    async fn create(
        &self,
        name: String,
        description: String,
        submitted_by: Uuid,
    ) -> AppResult<Submission> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            submitted_by: Set(submitted_by),
            status: Set(SubmissionStatus::Pending.as_str().to_string()),
            admin_note: Set(String::new()),
            processed_at: Set(None),
            created_at: Set(Utc::now()),
        };

        let model = active_model.insert(&self.db).await?;
        Submission::try_from(model)
    }

    async fn list_by_submitter(&self, user_id: Uuid) -> AppResult<Vec<Submission>> {
        let models = SubmissionEntity::find()
            .filter(submission::Column::SubmittedBy.eq(user_id))
            .order_by_desc(submission::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Submission::try_from).collect()
    }

    async fn list_pending(&self) -> AppResult<Vec<Submission>> {
        let models = SubmissionEntity::find()
            .filter(submission::Column::Status.eq(SubmissionStatus::Pending.as_str()))
            .order_by_desc(submission::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Submission::try_from).collect()
    }
}

pub(crate) async fn find_submission<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<Option<Submission>> {
    SubmissionEntity::find_by_id(id)
        .one(db)
        .await?
        .map(Submission::try_from)
        .transpose()
}
