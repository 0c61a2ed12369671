use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // pk_auto: AUTOINCREMENT on SQLite, a sequence on PostgreSQL, so
        // ids of deleted rows are never handed out again
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(pk_auto(Tasks::Id))
                    .col(string(Tasks::Name))
                    .col(text_null(Tasks::Description))
                    .col(date(Tasks::Deadline))
                    .col(timestamp_with_time_zone(Tasks::CreatedAt))
                    .col(boolean(Tasks::Completed).default(false))
                    .col(timestamp_with_time_zone_null(Tasks::CompletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tasks_created_at")
                    .table(Tasks::Table)
                    .col(Tasks::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tasks_completed_at")
                    .table(Tasks::Table)
                    .col(Tasks::Completed)
                    .col(Tasks::CompletedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Name,
    Description,
    Deadline,
    CreatedAt,
    Completed,
    CompletedAt,
}
