//! # Authentication Data Transfer Objects
//!
//! Request and response types for registration and login. Fields are
//! optional at the serde level so missing values produce the endpoint's own
//! messages rather than a generic deserialization error.

use entity::sea_orm_active_enums::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request body for registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(length(max = 100, message = "Name must not exceed 100 characters"))]
    pub name:     Option<String>,
    /// Checked for format after trimming and lowercasing
    pub email:    Option<String>,
    pub password: Option<String>,
    /// Anything other than a known role falls back to `Developer`
    pub role:     Option<String>,
}

/// Request body for login
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email:    Option<String>,
    pub password: Option<String>,
}

/// Returned by register and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id:    Uuid,
    pub name:  String,
    pub email: String,
    pub role:  UserRole,
    pub token: String,
}
