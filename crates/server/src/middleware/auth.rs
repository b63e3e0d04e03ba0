//! # Authentication Middleware
//!
//! Bearer-token authentication for every `/api` route except register and
//! login. The token only identifies the caller; the user record is reloaded
//! on each request so deleted accounts lose access immediately.

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use entity::{sea_orm_active_enums::UserRole, users};
use error::{AppError, ErrorBody};
use sea_orm::EntityTrait;
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;

const NO_TOKEN: &str = "Not authorized, no token";
const TOKEN_FAILED: &str = "Not authorized, token failed";

/// The caller, as loaded from the users table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    #[serde(rename = "_id")]
    pub id:         Uuid,
    pub name:       String,
    pub email:      String,
    pub role:       UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for AuthenticatedUser {
    fn from(user: users::Model) -> Self {
        Self {
            id:         user.id,
            name:       user.name,
            email:      user.email,
            role:       user.role,
            created_at: user.created_at,
        }
    }
}

/// Authentication middleware
///
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the JWT
/// 3. Loads the user it names
/// 4. Adds the user to request extensions
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(::auth::extract_bearer_token)
    {
        Some(token) => token.to_string(),
        None => return create_auth_error_response(NO_TOKEN),
    };

    let claims = match ::auth::validate_token(&state.jwt_config, &token) {
        Ok(claims) => claims,
        Err(_) => return create_auth_error_response(TOKEN_FAILED),
    };

    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return create_auth_error_response(TOKEN_FAILED),
    };

    let user = match users::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::debug!(user_id = %user_id, "Token names a user that no longer exists");
            return create_auth_error_response(TOKEN_FAILED);
        },
        Err(e) => return AppError::from(e).into_response(),
    };

    request
        .extensions_mut()
        .insert(AuthenticatedUser::from(user));

    next.run(request).await
}

/// Create standardized authentication error response
fn create_auth_error_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        axum::Json(ErrorBody::new("UNAUTHORIZED", message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[tokio::test]
    async fn test_auth_error_response_shape() {
        let response = create_auth_error_response(NO_TOKEN);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], NO_TOKEN);
    }

    #[test]
    fn test_authenticated_user_serializes_without_password() {
        let now = Utc::now();
        let user = AuthenticatedUser::from(users::Model {
            id:            Uuid::new_v4(),
            name:          "Ada".to_string(),
            email:         "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role:          UserRole::Admin,
            created_at:    now,
            updated_at:    now,
        });

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["role"], "Admin");
        assert!(json.get("_id").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
