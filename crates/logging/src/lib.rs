//! # DevCollab Logging Infrastructure
//!
//! Structured logging for the DevCollab application.
//! Provides tracing integration with JSON, pretty and compact output and
//! environment-based configuration.

pub mod config;
pub mod request_id;

pub use config::LoggingConfig;
pub use request_id::{REQUEST_ID_HEADER, RequestId};
pub use tracing::{debug, error, info, trace, warn};
pub use tracing_appender::non_blocking::WorkerGuard;

/// Initialize the logging system.
///
/// # Arguments
///
/// * `level` - Log level or filter directive
/// * `format` - Output format (json, pretty, compact)
/// * `log_file` - Optional path to log file
///
/// Returns the file writer guard when a log file is configured; dropping it
/// stops file output.
pub fn init(
    level: &str,
    format: &str,
    log_file: Option<&str>,
) -> Result<Option<WorkerGuard>, tracing::subscriber::SetGlobalDefaultError> {
    init_with_config(LoggingConfig::from_env(level, format, log_file))
}

/// Initialize logging with a custom configuration.
pub fn init_with_config(config: LoggingConfig) -> Result<Option<WorkerGuard>, tracing::subscriber::SetGlobalDefaultError> {
    let (subscriber, guard) = config.build();
    tracing::subscriber::set_global_default(subscriber)?;
    info!(
        level = %config.level,
        format = %config.format,
        environment = %config.environment,
        "Logging initialized"
    );
    Ok(guard)
}
