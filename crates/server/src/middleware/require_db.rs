//! # Storage Gate
//!
//! `/api` routes answer 503 straight away when the database cannot be reached
//! instead of failing midway through a handler.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use error::AppError;

use crate::AppState;

pub const DATABASE_UNAVAILABLE: &str = "Database unavailable";

pub async fn require_db_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Err(e) = state.db.ping().await {
        tracing::error!(error = %e, "Database ping failed");
        return AppError::unavailable(DATABASE_UNAVAILABLE).into_response();
    }

    next.run(request).await
}
