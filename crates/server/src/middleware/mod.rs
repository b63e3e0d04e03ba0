//! # HTTP Middleware
//!
//! Custom middleware for request processing.

pub mod auth;
pub mod request_id;
pub mod require_db;
pub mod security_headers;
