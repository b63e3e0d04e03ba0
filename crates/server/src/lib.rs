//! # DevCollab API Server
//!
//! Axum-based HTTP API for the DevCollab project-collaboration backend.
//!
//! ## Modules
//!
//! - [`dto`]: Request/response bodies
//! - [`handlers`]: Endpoint logic, one module per resource
//! - [`middleware`]: Request id, CORS, storage gate and bearer authentication
//! - [`router`]: Route table

use ::auth::JwtConfig;

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use router::create_app_router;

/// Application state shared across request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db:         sea_orm::DbConn,
    /// JWT configuration
    pub jwt_config: JwtConfig,
}

impl AppState {
    pub fn new(db: sea_orm::DbConn, jwt_config: JwtConfig) -> Self {
        Self {
            db,
            jwt_config,
        }
    }
}

/// Server initialization result
#[derive(Debug)]
pub struct ServerResult {
    /// The address the server is bound to
    pub address:    String,
    /// Server start timestamp for logging
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl ServerResult {
    #[must_use]
    pub fn new(address: &str) -> Self {
        Self {
            address:    address.to_string(),
            started_at: chrono::Utc::now(),
        }
    }
}
