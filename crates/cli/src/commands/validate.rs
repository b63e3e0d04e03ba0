//! # CLI Validate Command
//!
//! Reports configuration problems without starting the server.

use error::{AppError, Result};
use tracing::{info, warn};

use crate::config::{DatabaseConfig, JwtSettings, RECOMMENDED_SECRET_LEN, env_lookup, parse_socket_addr};

const SUPPORTED_SCHEMES: &[&str] = &["postgres", "postgresql", "sqlite"];

/// Outcome of a configuration check.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Settings that would stop the server from starting
    pub problems: Vec<String>,
    /// Settings that work but deserve attention
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool { self.problems.is_empty() }
}

/// Check every setting `serve` reads.
pub fn check(lookup: impl Fn(&str) -> Option<String>) -> ValidationReport {
    let mut report = ValidationReport::default();

    match DatabaseConfig::from_lookup(&lookup) {
        Ok(db) => {
            if let Some(url) = &db.url {
                let scheme = url.split_once("://").map(|(scheme, _)| scheme);
                if !scheme.is_some_and(|scheme| SUPPORTED_SCHEMES.contains(&scheme)) {
                    report
                        .problems
                        .push("DEVCOLLAB_DATABASE_URL must be a postgres:// or sqlite:// URL".to_string());
                }
            }
            else if db.password.is_empty() {
                report
                    .warnings
                    .push("DEVCOLLAB_DB_PASSWORD is empty".to_string());
            }
        },
        Err(e) => report.problems.push(e.to_string()),
    }

    match JwtSettings::from_lookup(&lookup) {
        Ok(jwt) => {
            match jwt.secret {
                None => report.problems.push("DEVCOLLAB_JWT_SECRET must be set".to_string()),
                Some(secret) if secret.len() < RECOMMENDED_SECRET_LEN => {
                    report.warnings.push(format!(
                        "DEVCOLLAB_JWT_SECRET is shorter than {} bytes",
                        RECOMMENDED_SECRET_LEN
                    ));
                },
                Some(_) => {},
            }
        },
        Err(e) => report.problems.push(e.to_string()),
    }

    let host = lookup("DEVCOLLAB_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
    let port = lookup("DEVCOLLAB_PORT").unwrap_or_else(|| "5000".to_string());
    match port.trim().parse::<u16>() {
        Ok(port) => {
            if parse_socket_addr(&host, port).is_err() {
                report
                    .problems
                    .push(format!("Invalid bind address {}:{}", host, port));
            }
        },
        Err(_) => report.problems.push(format!("Invalid value for DEVCOLLAB_PORT: {}", port)),
    }

    if let Some(origins) = lookup(::server::middleware::security_headers::CORS_ORIGINS_ENV) {
        for origin in origins.split(',').map(str::trim).filter(|o| !o.is_empty() && *o != "*") {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                report
                    .warnings
                    .push(format!("CORS origin '{}' has no http(s) scheme", origin));
            }
        }
    }

    report
}

/// Validates the process configuration, logging warnings.
pub fn validate() -> Result<()> {
    let report = check(env_lookup);

    for warning in &report.warnings {
        warn!(target: "validate", "{}", warning);
    }
    if !report.is_valid() {
        return Err(AppError::config(report.problems.join("; ")));
    }

    info!(target: "validate", warnings = report.warnings.len(), "Configuration is valid");
    Ok(())
}
