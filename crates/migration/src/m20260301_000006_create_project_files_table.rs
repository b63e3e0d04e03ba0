use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectFiles::Table)
                    .if_not_exists()
                    .col(uuid(ProjectFiles::Id).primary_key())
                    .col(uuid(ProjectFiles::ProjectId))
                    .col(uuid(ProjectFiles::UploadedBy))
                    .col(string_len(ProjectFiles::Name, 160))
                    .col(string_len(ProjectFiles::ContentType, 120))
                    .col(big_integer(ProjectFiles::Size))
                    .col(blob(ProjectFiles::Data))
                    .col(timestamp_with_time_zone(ProjectFiles::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_project_files_project_id")
                    .table(ProjectFiles::Table)
                    .col(ProjectFiles::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_project_files_uploaded_by")
                    .table(ProjectFiles::Table)
                    .col(ProjectFiles::UploadedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectFiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProjectFiles {
    Table,
    Id,
    ProjectId,
    UploadedBy,
    Name,
    ContentType,
    Size,
    Data,
    CreatedAt,
}
