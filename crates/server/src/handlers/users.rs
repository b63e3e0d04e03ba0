//! # Profile Handler
//!
//! Account details, activity counters and recent history for the caller.

use analytics::activity_stats;
use axum::Json;
use entity::{
    messages,
    project_files::{self, FileMeta},
    projects,
    tasks,
};
use error::Result;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use super::{project_titles, visible_to};
use crate::{
    AppState,
    dto::users::{
        FileHistoryEntry,
        HISTORY_LIMIT,
        MessageHistoryEntry,
        ProfileHistory,
        ProfileResponse,
        TaskHistoryEntry,
        UNKNOWN_PROJECT,
    },
    middleware::auth::AuthenticatedUser,
};

/// `GET /api/users/me/profile`
///
/// Counters cover the whole history; the lists hold the latest
/// [`HISTORY_LIMIT`] entries of each kind.
pub async fn my_profile_handler(state: &AppState, user: AuthenticatedUser) -> Result<Json<ProfileResponse>> {
    let project_count = projects::Entity::find()
        .filter(visible_to(user.id))
        .count(&state.db)
        .await?;

    let assigned = tasks::Entity::find()
        .filter(tasks::Column::AssignedTo.eq(user.id))
        .order_by_desc(tasks::Column::UpdatedAt)
        .all(&state.db)
        .await?;

    let messages_sent = messages::Entity::find()
        .filter(messages::Column::Sender.eq(user.id))
        .count(&state.db)
        .await?;
    let recent_messages = messages::Entity::find()
        .filter(messages::Column::Sender.eq(user.id))
        .order_by_desc(messages::Column::CreatedAt)
        .limit(HISTORY_LIMIT)
        .all(&state.db)
        .await?;

    let files_uploaded = project_files::Entity::find()
        .filter(project_files::Column::UploadedBy.eq(user.id))
        .count(&state.db)
        .await?;
    let recent_files = project_files::Entity::find()
        .select_only()
        .columns(FileMeta::COLUMNS)
        .filter(project_files::Column::UploadedBy.eq(user.id))
        .order_by_desc(project_files::Column::CreatedAt)
        .limit(HISTORY_LIMIT)
        .into_model::<FileMeta>()
        .all(&state.db)
        .await?;

    let stats = activity_stats(project_count, &assigned, messages_sent, files_uploaded);

    let recent_tasks = &assigned[.. assigned.len().min(HISTORY_LIMIT as usize)];
    let titles = project_titles(
        &state.db,
        recent_tasks
            .iter()
            .map(|t| t.project_id)
            .chain(recent_messages.iter().map(|m| m.project_id))
            .chain(recent_files.iter().map(|f| f.project_id))
            .collect::<Vec<_>>(),
    )
    .await?;
    let title_of = |project_id: Uuid| {
        titles
            .get(&project_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_PROJECT.to_string())
    };

    let history = ProfileHistory {
        tasks:    recent_tasks
            .iter()
            .map(|task| {
                TaskHistoryEntry {
                    id:            task.id,
                    title:         task.title.clone(),
                    status:        task.status,
                    project_title: title_of(task.project_id),
                    updated_at:    task.updated_at,
                }
            })
            .collect(),
        messages: recent_messages
            .into_iter()
            .map(|message| {
                MessageHistoryEntry {
                    id:            message.id,
                    project_title: title_of(message.project_id),
                    message:       message.text,
                    created_at:    message.created_at,
                }
            })
            .collect(),
        files:    recent_files
            .into_iter()
            .map(|file| {
                FileHistoryEntry {
                    id:            file.id,
                    project_title: title_of(file.project_id),
                    name:          file.name,
                    size:          file.size,
                    content_type:  file.content_type,
                    created_at:    file.created_at,
                }
            })
            .collect(),
    };

    Ok(Json(ProfileResponse {
        user,
        stats,
        history,
    }))
}
