//! Rating database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Rating;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ratings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub teacher_id: Uuid,
    /// Weak reference: ratings survive user removal
    pub user_id: Uuid,
    pub score: i32,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub is_anonymous: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id"
    )]
    Teacher,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Rating {
    fn from(model: Model) -> Self {
        Rating {
            id: model.id,
            teacher_id: model.teacher_id,
            user_id: model.user_id,
            score: model.score,
            comment: model.comment,
            is_anonymous: model.is_anonymous,
            created_at: model.created_at,
        }
    }
}
