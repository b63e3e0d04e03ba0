//! # DevCollab CLI
//!
//! Command-line interface for the DevCollab API server.
//!
//! ## Usage
//!
//! ```bash
//! devcollab serve      # Start the API server (runs migrations automatically)
//! devcollab migrate    # Run database migrations
//! devcollab validate   # Check configuration
//! devcollab --help     # Show help
//! ```
//!
//! Settings come from `DEVCOLLAB_*` environment variables; a `.env` file in
//! the working directory is loaded first.

mod commands;
mod config;
mod server;

use clap::{CommandFactory as _, Parser};
use commands::Commands;
use error::{AppError, Result};

use crate::config::{DatabaseConfig, JwtSettings};

/// DevCollab - project collaboration API
#[derive(Parser, Debug)]
#[command(name = "devcollab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level or filter directive (debug, info, warn, error)
    #[arg(short = 'L', long, env = "DEVCOLLAB_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "DEVCOLLAB_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// Also write logs to this file, rotated hourly
    #[arg(long, env = "DEVCOLLAB_LOG_FILE")]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let _guard = logging::init(&cli.log_level, &cli.log_format, cli.log_file.as_deref())
        .map_err(|e| AppError::config(format!("Failed to initialize logging: {}", e)))?;

    if let Ok(path) = dotenv {
        logging::debug!(target: "app", path = %path.display(), "Loaded .env");
    }
    logging::info!(target: "app", command = ?cli.command, "DevCollab CLI starting...");

    match cli.command {
        Commands::Serve(args) => {
            let db_config = DatabaseConfig::from_env()?;
            let jwt = JwtSettings::from_env()?;
            server::serve(&db_config, &jwt, &args).await?;
        },
        Commands::Migrate(args) => {
            let db_config = DatabaseConfig::from_env()?;
            commands::migrate::migrate(&db_config, &args).await?;
        },
        Commands::Completions(args) => commands::completions::completions(args.shell, &mut Cli::command()),
        Commands::Validate => commands::validate::validate()?,
    }

    logging::info!(target: "app", "DevCollab CLI completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["devcollab", "serve", "--host", "127.0.0.1", "--port", "8080"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host, "127.0.0.1");
                assert_eq!(args.port, 8080);
            },
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_validate() {
        let cli = Cli::parse_from(["devcollab", "validate"]);
        assert!(matches!(cli.command, Commands::Validate));
    }

    #[test]
    fn test_cli_log_flags() {
        let cli = Cli::parse_from(["devcollab", "-L", "debug", "--log-format", "json", "validate"]);
        assert_eq!(cli.log_level, "debug");
        assert_eq!(cli.log_format, "json");
    }

    #[test]
    fn test_migrate_flags() {
        let cli = Cli::parse_from(["devcollab", "migrate", "--rollback"]);
        match cli.command {
            Commands::Migrate(args) => {
                assert!(args.rollback);
                assert!(!args.dry_run);
            },
            _ => panic!("Expected Migrate command"),
        }

        let both = Cli::try_parse_from(["devcollab", "migrate", "--rollback", "--dry-run"]);
        assert!(both.is_err());
    }

    #[test]
    fn test_completions_shell() {
        let cli = Cli::parse_from(["devcollab", "completions", "bash"]);
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, clap_complete::Shell::Bash),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_command_factory() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "devcollab");
        cmd.debug_assert();
    }
}
