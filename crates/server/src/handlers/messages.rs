//! # Project Chat Handlers
//!
//! Messages are append-only: there is no edit or delete endpoint.

use auth::AccessGuard;
use axum::Json;
use chrono::Utc;
use entity::messages::{self, Column as MessageColumn, Entity as MessagesEntity};
use error::{AppError, Result, ResultExt as _};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::load_users;
use crate::{
    AppState,
    dto::{
        messages::{ChatMessageResponse, SendMessageRequest},
        non_blank,
    },
    middleware::auth::AuthenticatedUser,
};

/// Most messages returned by one listing.
pub const MESSAGE_HISTORY_LIMIT: u64 = 200;

/// Chat history, oldest first.
pub async fn list_messages_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: Uuid,
) -> Result<Json<Vec<ChatMessageResponse>>> {
    AccessGuard::new(&state.db)
        .authorize_chat(project_id, user.id)
        .await?;

    let history = MessagesEntity::find()
        .filter(MessageColumn::ProjectId.eq(project_id))
        .order_by_asc(MessageColumn::CreatedAt)
        .limit(MESSAGE_HISTORY_LIMIT)
        .all(&state.db)
        .await?;

    let directory = load_users(&state.db, history.iter().map(|m| m.sender).collect::<Vec<_>>()).await?;

    Ok(Json(
        history
            .into_iter()
            .map(|message| ChatMessageResponse::populate(message, &directory))
            .collect(),
    ))
}

/// Post a message. Blank messages are refused before the access check.
pub async fn send_message_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: Uuid,
    req: SendMessageRequest,
) -> Result<ChatMessageResponse> {
    let text = non_blank(req.message.as_deref())
        .ok_or_else(|| AppError::bad_request("Message is required"))?
        .to_string();
    req.validate()?;

    AccessGuard::new(&state.db)
        .authorize_chat(project_id, user.id)
        .await?;

    let message = messages::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        sender: Set(user.id),
        text: Set(text),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await
    .with_context("Failed to save message")?;

    info!(message_id = %message.id, project_id = %project_id, user_id = %user.id, "Message sent");

    let directory = load_users(&state.db, [user.id]).await?;
    Ok(ChatMessageResponse::populate(message, &directory))
}
