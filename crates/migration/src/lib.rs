//! # DevCollab Migrations
//!
//! Schema migrations and the connection helper used by the CLI and tests.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users_table;
mod m20260301_000002_create_projects_table;
mod m20260301_000003_create_project_members_table;
mod m20260301_000004_create_tasks_table;
mod m20260301_000005_create_messages_table;
mod m20260301_000006_create_project_files_table;
mod migrator;

pub use migrator::Migrator;
use sea_orm_migration::sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

/// Connect to the database at `database_url`.
pub async fn connect_to_database(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    connect_with_options(ConnectOptions::new(database_url)).await
}

/// Connect with explicit pool options.
pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    tracing::debug!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}

/// Open an in-memory SQLite database with the full schema applied.
///
/// A single connection is used so every query sees the same database.
pub async fn connect_in_memory() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = connect_with_options(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::sea_orm::Statement;

    use super::*;

    #[tokio::test]
    async fn test_migrations_apply_and_roll_back() {
        let db = connect_in_memory().await.unwrap();

        let applied = Migrator::get_applied_migrations(&db).await.unwrap();
        assert_eq!(applied.len(), 6);
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());

        Migrator::down(&db, None).await.unwrap();
        let remaining = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT count(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'tasks'",
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(remaining.try_get::<i64>("", "n").unwrap(), 0);
    }
}
