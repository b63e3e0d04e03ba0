//! # CLI Commands
//!
//! Subcommands of the `devcollab` binary and their arguments.

pub mod completions;
pub mod migrate;
pub mod validate;

use clap::{Args, Subcommand};

/// Available commands for the DevCollab CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server (runs pending migrations first)
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Check configuration without starting the server
    Validate,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "DEVCOLLAB_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(short, long, env = "DEVCOLLAB_PORT", default_value = "5000")]
    pub port: u16,

    /// Include internal error details in 5xx responses
    #[arg(long, env = "DEVCOLLAB_DETAILED_ERRORS")]
    pub detailed_errors: bool,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// List pending migrations without applying them
    #[arg(long, conflicts_with = "rollback")]
    pub dry_run: bool,

    /// Roll back the most recent migration
    #[arg(long)]
    pub rollback: bool,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
