//! # Database Migrator
//!
//! Implements the Sea-ORM migrator trait for the DevCollab schema.

use sea_orm_migration::prelude::*;

use crate::{
    m20260301_000001_create_users_table,
    m20260301_000002_create_projects_table,
    m20260301_000003_create_project_members_table,
    m20260301_000004_create_tasks_table,
    m20260301_000005_create_messages_table,
    m20260301_000006_create_project_files_table,
};

/// The migrator that applies the DevCollab schema in order.
///
/// ```rust,ignore
/// use migration::{Migrator, MigratorTrait};
///
/// Migrator::up(&db, None).await?;
/// ```
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users_table::Migration),
            Box::new(m20260301_000002_create_projects_table::Migration),
            Box::new(m20260301_000003_create_project_members_table::Migration),
            Box::new(m20260301_000004_create_tasks_table::Migration),
            Box::new(m20260301_000005_create_messages_table::Migration),
            Box::new(m20260301_000006_create_project_files_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_ordered() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names.len(), 6);

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
