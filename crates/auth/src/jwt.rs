//! # JWT Token Management
//!
//! HS256 access tokens identifying a user and their role.

use std::{collections::HashSet, fmt};

use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::UserRole;
use error::{AppError, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token lifetime.
pub const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// Signing configuration for access tokens.
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret:      SecretString,
    /// Token lifetime in days
    pub expiry_days: i64,
    /// Token issuer
    pub issuer:      String,
    /// Token audience
    pub audience:    String,
}

impl JwtConfig {
    /// Create a configuration with the default lifetime, issuer and audience.
    pub fn new(secret: impl Into<SecretString>) -> Self {
        Self {
            secret:      secret.into(),
            expiry_days: DEFAULT_EXPIRY_DAYS,
            issuer:      "devcollab".to_string(),
            audience:    "devcollab-api".to_string(),
        }
    }

    /// Override the token lifetime.
    #[must_use]
    pub fn with_expiry_days(mut self, days: i64) -> Self {
        self.expiry_days = days;
        self
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiry_days", &self.expiry_days)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub:  String,
    /// Role at the time the token was issued
    pub role: UserRole,
    pub iss:  String,
    pub aud:  String,
    /// Expiration time (Unix timestamp)
    pub exp:  i64,
    /// Issued at (Unix timestamp)
    pub iat:  i64,
    /// Unique token ID
    pub jti:  String,
}

impl Claims {
    /// The user ID carried in `sub`.
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::unauthorized("Not authorized, token failed"))
    }
}

/// Creates a new access token for `user_id`.
pub fn create_access_token(config: &JwtConfig, user_id: Uuid, role: UserRole) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        exp: (now + Duration::days(config.expiry_days)).timestamp(),
        iat: now.timestamp(),
        jti: cuid2::cuid(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode token: {}", e)))
}

/// Validates a token's signature, expiry, issuer and audience.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());

    let mut validation = Validation::default();
    validation.iss = Some(HashSet::from([config.issuer.clone()]));
    validation.aud = Some(HashSet::from([config.audience.clone()]));
    validation.validate_exp = true;

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Token validation failed");
            AppError::unauthorized("Not authorized, token failed")
        })
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let token = auth_header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig { JwtConfig::new("test-secret-key-that-is-at-least-32-bytes-long") }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let token = create_access_token(&config(), user_id, UserRole::Admin).unwrap();

        let claims = validate_token(&config(), &token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.iss, "devcollab");
        assert_eq!(claims.aud, "devcollab-api");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_access_token(&config(), Uuid::new_v4(), UserRole::Viewer).unwrap();
        let other = JwtConfig::new("a-completely-different-secret-value-here");
        let err = validate_token(&other, &token).unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");
        assert_eq!(err.message(), "Not authorized, token failed");
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = config().with_expiry_days(-2);
        let token = create_access_token(&expired, Uuid::new_v4(), UserRole::Developer).unwrap();
        assert!(validate_token(&config(), &token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(validate_token(&config(), "not.a.token").is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", config());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("test-secret-key"));
    }

    #[test]
    fn test_extract_bearer_token() {
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test-token";
        assert_eq!(extract_bearer_token(&format!("Bearer {}", token)), Some(token));
    }

    #[test]
    fn test_extract_bearer_token_invalid_format() {
        assert!(extract_bearer_token("Basic abc123").is_none());
        assert!(extract_bearer_token("Bearer").is_none());
        assert!(extract_bearer_token("Bearer    ").is_none());
        assert!(extract_bearer_token("").is_none());
    }
}
