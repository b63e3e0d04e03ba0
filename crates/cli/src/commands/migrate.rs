//! # CLI Migration Command
//!
//! Applies, previews or rolls back schema migrations.

use error::{AppError, Result};
use migration::{Migrator, MigratorTrait as _};
use sea_orm::DbErr;
use tracing::info;

use crate::{commands::MigrateArgs, config::DatabaseConfig};

/// Wraps a migrator failure.
pub(crate) fn migration_failed(action: &str, err: DbErr) -> AppError { AppError::migration(format!("Failed to {}: {}", action, err)) }

/// Runs database migrations
pub async fn migrate(config: &DatabaseConfig, args: &MigrateArgs) -> Result<()> {
    info!(
        target: "migrate",
        database = %config.describe(),
        dry_run = %args.dry_run,
        rollback = %args.rollback,
        "Running database migrations..."
    );

    let db = migration::connect_with_options(config.connect_options())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    if args.dry_run {
        let pending = Migrator::get_pending_migrations(&db)
            .await
            .map_err(|e| migration_failed("get pending migrations", e))?;

        info!(target: "migrate", pending_count = %pending.len(), "Dry run, nothing applied");
        for m in &pending {
            info!(target: "migrate", migration = %m.name(), "Would apply");
        }
        return Ok(());
    }

    if args.rollback {
        Migrator::down(&db, Some(1))
            .await
            .map_err(|e| migration_failed("rollback migration", e))?;

        info!(target: "migrate", "Rollback completed successfully");
        return Ok(());
    }

    Migrator::up(&db, None)
        .await
        .map_err(|e| migration_failed("run migrations", e))?;

    info!(target: "migrate", "Migrations completed successfully");
    Ok(())
}
