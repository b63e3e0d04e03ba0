//! # API Response Bodies
//!
//! JSON bodies shared by every endpoint for errors and plain acknowledgements.
//!
//! ```json
//! { "success": false, "code": "FORBIDDEN", "message": "You do not have access to this project" }
//! ```

use serde::{Deserialize, Serialize};

/// Body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub success: bool,
    pub code:    String,
    pub message: String,
}

impl ErrorBody {
    /// Create an error body.
    pub fn new(code: impl ToString, message: impl ToString) -> Self {
        Self {
            success: false,
            code:    code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Acknowledgement returned by delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
