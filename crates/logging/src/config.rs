//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

/// Boxed subscriber produced by [`LoggingConfig::build`].
pub type BoxedSubscriber = Box<dyn tracing::Subscriber + Send + Sync>;

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level or filter directive (debug, info, `server=debug,info`)
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (json, pretty, compact)
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file path, rotated hourly
    #[serde(default)]
    pub log_file: Option<String>,

    /// Environment (development, testing, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_level() -> String { "info".to_string() }

fn default_format() -> String { "compact".to_string() }

fn default_environment() -> String { "development".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:       default_level(),
            format:      default_format(),
            log_file:    None,
            environment: default_environment(),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables, falling back to the
    /// given values.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self {
            level:       std::env::var("DEVCOLLAB_LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or_else(|_| level.to_string()),
            format:      std::env::var("DEVCOLLAB_LOG_FORMAT").unwrap_or_else(|_| format.to_string()),
            log_file:    std::env::var("DEVCOLLAB_LOG_FILE")
                .ok()
                .or(log_file.map(|s| s.to_string())),
            environment: std::env::var("DEVCOLLAB_ENV").unwrap_or_else(|_| default_environment()),
        }
    }

    /// Whether this configuration describes a production deployment.
    pub fn is_production(&self) -> bool { self.environment.eq_ignore_ascii_case("production") }

    fn filter(&self) -> EnvFilter { EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info")) }

    /// Build the tracing subscriber from this configuration.
    ///
    /// The returned guard must be kept alive for as long as file logging
    /// should be flushed.
    pub fn build(&self) -> (BoxedSubscriber, Option<WorkerGuard>) {
        let (file_layer, guard) = match self.log_file.as_deref() {
            Some(log_file) => {
                let path = Path::new(log_file);
                let directory = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "devcollab.log".to_string());
                let appender = tracing_appender::rolling::hourly(directory, file_name);
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .json()
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(non_blocking);
                (Some(layer), Some(guard))
            },
            None => (None, None),
        };

        let registry = Registry::default().with(self.filter()).with(file_layer);

        let subscriber: BoxedSubscriber = match self.format.as_str() {
            "pretty" => {
                Box::new(
                    registry.with(
                        fmt::layer()
                            .pretty()
                            .with_timer(fmt::time::UtcTime::rfc_3339()),
                    ),
                )
            },
            "compact" => {
                Box::new(
                    registry.with(
                        fmt::layer()
                            .compact()
                            .with_timer(fmt::time::UtcTime::rfc_3339()),
                    ),
                )
            },
            _ => {
                Box::new(
                    registry.with(
                        fmt::layer()
                            .json()
                            .with_timer(fmt::time::UtcTime::rfc_3339()),
                    ),
                )
            },
        };

        (subscriber, guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "compact");
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
    }

    #[test]
    fn test_config_deserialize_kebab_case() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"level":"debug","log-file":"/tmp/devcollab.log","environment":"production"}"#)
                .unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, "compact");
        assert_eq!(config.log_file.as_deref(), Some("/tmp/devcollab.log"));
        assert!(config.is_production());
    }

    #[test]
    fn test_build_each_format() {
        for format in ["json", "pretty", "compact", "unknown"] {
            let config = LoggingConfig {
                level: "debug".to_string(),
                format: format.to_string(),
                ..Default::default()
            };
            let (_subscriber, guard) = config.build();
            assert!(guard.is_none());
        }
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let config = LoggingConfig {
            level: "server=verbose".to_string(),
            ..Default::default()
        };
        assert_eq!(config.filter().to_string(), "info");

        let valid = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(valid.filter().to_string(), "debug");
    }
}
