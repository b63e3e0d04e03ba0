//! # Error Response Rendering
//!
//! Converts [`AppError`] values into JSON HTTP responses.
//!
//! ## Usage
//!
//! ```rust
//! use error::{AppError, ErrorHandler};
//!
//! let handler = ErrorHandler::new(false);
//! let response = handler.to_response(&AppError::not_found("Project not found"));
//! assert_eq!(response.status(), 404);
//! ```

use std::sync::OnceLock;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{AppError, response::ErrorBody};

static DETAILED_ERRORS: OnceLock<bool> = OnceLock::new();

/// Enable or disable detailed server error messages for the whole process.
///
/// Only the first call has an effect.
pub fn configure_detailed_errors(enabled: bool) {
    if DETAILED_ERRORS.set(enabled).is_err() {
        tracing::debug!("Detailed error setting already configured");
    }
}

/// Error handler that converts errors to HTTP responses.
#[derive(Debug, Clone, Copy)]
pub struct ErrorHandler {
    /// Whether to include server error details in the response.
    pub include_details: bool,
}

impl Default for ErrorHandler {
    fn default() -> Self { Self::new(DETAILED_ERRORS.get().copied().unwrap_or(false)) }
}

impl ErrorHandler {
    /// Create a new error handler.
    #[inline]
    pub fn new(include_details: bool) -> Self {
        Self {
            include_details,
        }
    }

    /// The message sent to the client for `err`.
    pub fn public_message(&self, err: &AppError) -> String {
        if !err.is_server_error() || self.include_details {
            return err.message().to_string();
        }

        match err.status() {
            StatusCode::SERVICE_UNAVAILABLE => "Database unavailable".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// Convert an error to a response.
    pub fn to_response(&self, err: &AppError) -> Response {
        if err.is_server_error() {
            tracing::error!(code = err.code(), error = %err, "Request failed");
        }
        else {
            tracing::debug!(code = err.code(), error = %err, "Request rejected");
        }

        let body = ErrorBody::new(err.code(), self.public_message(err));
        (err.status(), Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response { ErrorHandler::default().to_response(&self) }
}
