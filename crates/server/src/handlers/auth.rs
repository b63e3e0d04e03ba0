//! # Authentication Handlers
//!
//! Registration, login and the current-user endpoint.

use auth::{
    create_access_token,
    hash_password,
    secrecy::{ExposeSecret, SecretString},
    validate_password_strength,
    verify_password,
};
use axum::Json;
use chrono::Utc;
use entity::{
    sea_orm_active_enums::UserRole,
    users::{self, Column, Entity as UsersEntity, normalize_email},
};
use error::{AppError, DbResultExt as _, Result, ResultExt as _};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use crate::{
    AppState,
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest},
        non_blank,
    },
    middleware::auth::AuthenticatedUser,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Create an account and return a token for it.
pub async fn register_handler_inner(state: &AppState, req: RegisterRequest) -> Result<AuthResponse> {
    let email = normalize_email(req.email.as_deref().unwrap_or_default());
    let name = req.name.as_deref().unwrap_or_default().trim().to_string();
    let password = req.password.clone().unwrap_or_default();

    if email.is_empty() {
        return Err(AppError::bad_request("Email is required"));
    }
    if name.is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }
    validate_password_strength(&password).map_err(AppError::bad_request)?;
    if !email.validate_email() {
        return Err(AppError::bad_request("Invalid email format"));
    }
    req.validate()?;

    let existing = UsersEntity::find()
        .filter(Column::Email.eq(&email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::bad_request("User already exists"));
    }

    let role = UserRole::from_optional(non_blank(req.role.as_deref()));
    let password_hash = hash_password(&SecretString::from(password), None)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let now = Utc::now();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash.expose_secret().to_string()),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .on_duplicate("User already exists")
    .with_context("Failed to create user")?;

    info!(user_id = %user.id, role = %user.role, "User registered");

    auth_response(state, user)
}

/// Check credentials and return a fresh token.
pub async fn login_handler_inner(state: &AppState, req: LoginRequest) -> Result<AuthResponse> {
    let email = normalize_email(req.email.as_deref().unwrap_or_default());
    let password = req.password.unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(AppError::bad_request("Email and password are required"));
    }

    let user = UsersEntity::find()
        .filter(Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::bad_request(INVALID_CREDENTIALS))?;

    verify_password(&SecretString::from(password), &user.password_hash).map_err(|e| {
        tracing::debug!(user_id = %user.id, error = %e, "Password verification failed");
        AppError::bad_request(INVALID_CREDENTIALS)
    })?;

    info!(user_id = %user.id, "User logged in");

    auth_response(state, user)
}

/// The authenticated user, as loaded by the auth middleware.
pub async fn profile_handler_inner(user: AuthenticatedUser) -> Result<Json<AuthenticatedUser>> { Ok(Json(user)) }

fn auth_response(state: &AppState, user: users::Model) -> Result<AuthResponse> {
    let token = create_access_token(&state.jwt_config, user.id, user.role)?;

    Ok(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        token,
    })
}
