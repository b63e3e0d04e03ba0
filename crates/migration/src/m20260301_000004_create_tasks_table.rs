use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign key to projects: tasks are kept when their project is deleted
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(uuid(Tasks::Id).primary_key())
                    .col(string_len(Tasks::Title, 255))
                    .col(text(Tasks::Description).default(""))
                    .col(string_len(Tasks::Status, 20).default("To Do"))
                    .col(uuid_null(Tasks::AssignedTo))
                    .col(uuid(Tasks::ProjectId))
                    .col(timestamp_with_time_zone_null(Tasks::Deadline))
                    .col(timestamp_with_time_zone(Tasks::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Tasks::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tasks_project_id")
                    .table(Tasks::Table)
                    .col(Tasks::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tasks_assigned_to")
                    .table(Tasks::Table)
                    .col(Tasks::AssignedTo)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Tasks {
    Table,
    Id,
    Title,
    Description,
    Status,
    AssignedTo,
    ProjectId,
    Deadline,
    CreatedAt,
    UpdatedAt,
}
