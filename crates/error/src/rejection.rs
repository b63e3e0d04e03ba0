//! # Rejection Handlers
//!
//! Converts Axum extractor rejections into API errors.

use axum::extract::rejection::{JsonRejection, PathRejection};

use crate::AppError;

/// Turn a JSON body rejection into a 400 with a readable message.
///
/// Serde messages such as "missing field `email` at line 1 column 2" are
/// reduced to "Missing required field: email".
pub fn json_rejection(rejection: JsonRejection) -> AppError {
    let error_message = rejection.body_text();
    AppError::bad_request(missing_field_message(&error_message).unwrap_or(error_message))
}

/// Turn a path parameter rejection into a 400.
pub fn path_rejection(rejection: PathRejection) -> AppError {
    AppError::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
}

fn missing_field_message(error_message: &str) -> Option<String> {
    let start = error_message.find("missing field `")? + "missing field `".len();
    let end = error_message[start ..].find('`')?;
    Some(format!(
        "Missing required field: {}",
        &error_message[start .. start + end]
    ))
}
