//! Teacher database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Teacher;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub rating_count: i64,
    pub rating_sum: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rating::Entity")]
    Rating,
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rating.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Teacher {
    fn from(model: Model) -> Self {
        Teacher {
            id: model.id,
            name: model.name,
            description: model.description,
            is_active: model.is_active,
            rating_count: model.rating_count,
            rating_sum: model.rating_sum,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
