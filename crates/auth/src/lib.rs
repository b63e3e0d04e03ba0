//! # Authentication and Access Control
//!
//! - Password hashing and validation
//! - JWT access tokens
//! - The project Access Guard and role, creator and uploader checks

pub mod access;
pub mod jwt;
pub mod password;

pub use access::{
    AccessDenied,
    AccessError,
    AccessGuard,
    AccessScope,
    CreatorAction,
    ProjectAccess,
    is_member,
    require_admin_or_uploader,
    require_creator,
    require_role,
};
pub use jwt::{Claims, JwtConfig, create_access_token, extract_bearer_token, validate_token};
pub use password::{hash_password, validate_password_strength, verify_password};
pub use secrecy;
