//! # Error Traits
//!
//! Extension methods for turning foreign results into [`AppError`] results.

use crate::{AppError, Result};

/// Extension methods for Result types.
pub trait ResultExt<T> {
    /// Convert the error and prefix server-side messages with `context`.
    fn with_context<C: ToString>(self, context: C) -> Result<T>;

    /// Convert the error and log it at error level.
    fn log_error(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.context(context)
        })
    }

    fn log_error(self) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            tracing::error!(error = %err, "Error occurred");
            err
        })
    }
}

/// Extension methods for sea-orm results.
pub trait DbResultExt<T> {
    /// Report a unique constraint violation as a conflict carrying `message`.
    fn on_duplicate(self, message: impl ToString) -> Result<T>;
}

impl<T> DbResultExt<T> for std::result::Result<T, sea_orm::DbErr> {
    fn on_duplicate(self, message: impl ToString) -> Result<T> {
        self.map_err(|err| {
            match err.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(message),
                _ => err.into(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_on_db_error() {
        let result: std::result::Result<(), sea_orm::DbErr> = Err(sea_orm::DbErr::Custom("boom".to_string()));
        let err = result.with_context("Loading project").unwrap_err();
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert!(err.message().starts_with("Loading project: "));
    }

    #[test]
    fn test_on_duplicate_passes_other_errors_through() {
        let result: std::result::Result<(), sea_orm::DbErr> = Err(sea_orm::DbErr::Custom("boom".to_string()));
        let err = result
            .on_duplicate("User already exists")
            .with_context("Failed to create user")
            .unwrap_err();
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert!(err.message().starts_with("Failed to create user: "));
        assert!(err.message().contains("boom"));
    }

    #[test]
    fn test_log_error_preserves_variant() {
        let result: std::result::Result<(), AppError> = Err(AppError::not_found("Task not found"));
        let err = result.log_error().unwrap_err();
        assert_eq!(err.message(), "Task not found");
    }
}
