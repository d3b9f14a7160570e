//! Migration: Create submissions table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submissions::Name).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Submissions::SubmittedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Submissions::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending")
                            .check(Expr::col(Submissions::Status).is_in([
                                "pending",
                                "approved",
                                "rejected",
                            ])),
                    )
                    .col(
                        ColumnDef::new(Submissions::AdminNote)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Submissions::ProcessedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_status")
                    .table(Submissions::Table)
                    .col(Submissions::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_submitted_by")
                    .table(Submissions::Table)
                    .col(Submissions::SubmittedBy)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Submissions {
    Table,
    Id,
    Name,
    Description,
    SubmittedBy,
    Status,
    AdminNote,
    ProcessedAt,
    CreatedAt,
}
