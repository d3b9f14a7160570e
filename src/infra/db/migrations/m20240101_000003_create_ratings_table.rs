//! Migration: Create ratings table.
//!
//! One rating per (user, teacher) is enforced by a unique index. Deleting a
//! teacher with ratings is refused by the foreign key; the application
//! removes ratings first inside the same transaction.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_teachers_table::Teachers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ratings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ratings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Ratings::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(Ratings::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Ratings::Score)
                            .integer()
                            .not_null()
                            .check(Expr::col(Ratings::Score).between(1, 5)),
                    )
                    .col(ColumnDef::new(Ratings::Comment).text().not_null())
                    .col(
                        ColumnDef::new(Ratings::IsAnonymous)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Ratings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_teacher")
                            .from(Ratings::Table, Ratings::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_ratings_user_teacher")
                    .table(Ratings::Table)
                    .col(Ratings::UserId)
                    .col(Ratings::TeacherId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_teacher_id")
                    .table(Ratings::Table)
                    .col(Ratings::TeacherId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ratings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Ratings {
    Table,
    Id,
    TeacherId,
    UserId,
    Score,
    Comment,
    IsAnonymous,
    CreatedAt,
}
