//! # CLI Server
//!
//! Connects to storage, applies pending migrations and serves the API until
//! Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::anyhow;
use error::Result;
use migration::{Migrator, MigratorTrait as _};
use ::server::{AppState, ServerResult, router::create_app_router};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    commands::{ServeArgs, migrate},
    config::{DatabaseConfig, JwtSettings, parse_socket_addr},
};

/// Starts the API server
pub async fn serve(db_config: &DatabaseConfig, jwt: &JwtSettings, args: &ServeArgs) -> Result<()> {
    info!(target: "serve", "Starting API server...");

    error::configure_detailed_errors(args.detailed_errors);
    let jwt_config = jwt.jwt_config()?;

    let address = parse_socket_addr(&args.host, args.port)
        .map_err(|e| anyhow!("Invalid address {}:{}: {}", args.host, args.port, e))?;

    info!(target: "serve", database = %db_config.describe(), "Connecting to database...");
    let db = migration::connect_with_options(db_config.connect_options())
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    info!(target: "serve", "Running database migrations...");
    Migrator::up(&db, None)
        .await
        .map_err(|e| migrate::migration_failed("run database migrations", e))?;
    info!(target: "serve", "Database migrations completed successfully");

    let app = create_app_router(AppState::new(db, jwt_config));
    serve_http(app, &address).await
}

async fn serve_http(app: axum::Router, address: &SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", address, e))?;

    let started = ServerResult::new(&address.to_string());
    info!(target: "serve", address = %started.address, started_at = %started.started_at, "DevCollab API listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow!("HTTP server error: {}", e))?;

    info!(target: "serve", "Server stopped");
    Ok(())
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM)
#[allow(
    clippy::integer_division_remainder_used,
    reason = "tokio::select! macro triggers false positive"
)]
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(target: "serve", error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(target: "serve", error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(target: "serve", "Shutdown signal received, draining connections");
}
