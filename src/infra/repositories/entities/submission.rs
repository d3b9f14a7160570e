//! Submission database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Submission, SubmissionStatus};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub submitted_by: Uuid,
    /// `pending`, `approved` or `rejected`
    pub status: String,
    pub admin_note: String,
    pub processed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Submission {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Submission {
            status: SubmissionStatus::try_from(model.status.as_str())?,
            id: model.id,
            name: model.name,
            description: model.description,
            submitted_by: model.submitted_by,
            admin_note: model.admin_note,
            processed_at: model.processed_at,
            created_at: model.created_at,
        })
    }
}
