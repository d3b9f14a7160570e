//! Migration: Create teachers table with aggregate checks.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teachers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Teachers::Name).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Teachers::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Teachers::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Teachers::RatingCount)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Teachers::RatingCount).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Teachers::RatingSum)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Teachers::RatingSum).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Teachers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Teachers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(
                        Expr::col(Teachers::RatingSum)
                            .lte(Expr::col(Teachers::RatingCount).mul(5)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_teachers_is_active")
                    .table(Teachers::Table)
                    .col(Teachers::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Teachers {
    Table,
    Id,
    Name,
    Description,
    IsActive,
    RatingCount,
    RatingSum,
    CreatedAt,
    UpdatedAt,
}
