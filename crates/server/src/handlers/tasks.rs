//! # Task Handlers
//!
//! Any member of a project may create, edit and delete its tasks. Status
//! changes are unconstrained: any state may follow any other.

use auth::AccessGuard;
use axum::Json;
use chrono::Utc;
use entity::{
    sea_orm_active_enums::TaskStatus,
    tasks::{self, Column as TaskColumn, Entity as TasksEntity},
};
use error::{AppError, MessageResponse, Result, ResultExt as _};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::load_users;
use crate::{
    AppState,
    dto::{
        non_blank,
        parse_optional_deadline,
        tasks::{CreateTaskRequest, TaskResponse, UpdateTaskRequest},
    },
    middleware::auth::AuthenticatedUser,
};

/// Parse a status label, rejecting anything outside the three known states.
fn parse_status(value: Option<&str>) -> Result<Option<TaskStatus>> {
    non_blank(value)
        .map(|label| {
            label.parse::<TaskStatus>().map_err(|_| {
                AppError::bad_request(format!(
                    "Invalid status '{}'. Expected one of: To Do, In Progress, Completed",
                    label
                ))
            })
        })
        .transpose()
}

/// Tasks of a project, newest first.
pub async fn list_tasks_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: Uuid,
) -> Result<Json<Vec<TaskResponse>>> {
    AccessGuard::new(&state.db)
        .authorize(project_id, user.id)
        .await?;

    let tasks = TasksEntity::find()
        .filter(TaskColumn::ProjectId.eq(project_id))
        .order_by_desc(TaskColumn::CreatedAt)
        .all(&state.db)
        .await?;

    let directory = load_users(&state.db, tasks.iter().filter_map(|t| t.assigned_to).collect::<Vec<_>>()).await?;

    Ok(Json(
        tasks
            .into_iter()
            .map(|task| TaskResponse::populate(task, &directory))
            .collect(),
    ))
}

/// Create a task in a project the caller belongs to.
pub async fn create_task_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateTaskRequest,
) -> Result<TaskResponse> {
    let project_id = req
        .project_id
        .ok_or_else(|| AppError::bad_request("projectId is required"))?;
    let title = non_blank(req.title.as_deref())
        .ok_or_else(|| AppError::bad_request("Title is required"))?
        .to_string();
    req.validate()?;
    let status = parse_status(req.status.as_deref())?.unwrap_or_default();
    let deadline = parse_optional_deadline(req.deadline.as_deref())?;

    AccessGuard::new(&state.db)
        .authorize(project_id, user.id)
        .await?;

    let now = Utc::now();
    let task = tasks::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        description: Set(req.description.unwrap_or_default().trim().to_string()),
        status: Set(status),
        assigned_to: Set(req.assigned_to),
        project_id: Set(project_id),
        deadline: Set(deadline),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .with_context("Failed to create task")?;

    info!(task_id = %task.id, project_id = %project_id, user_id = %user.id, "Task created");

    let directory = load_users(&state.db, task.assigned_to).await?;
    Ok(TaskResponse::populate(task, &directory))
}

/// Partial update: only non-blank fields change, and `updatedAt` is always
/// refreshed.
pub async fn update_task_handler(
    state: &AppState,
    user: AuthenticatedUser,
    task_id: Uuid,
    req: UpdateTaskRequest,
) -> Result<Json<TaskResponse>> {
    let task = find_task(state, task_id).await?;
    req.validate()?;

    AccessGuard::new(&state.db)
        .authorize(task.project_id, user.id)
        .await?;

    let status = parse_status(req.status.as_deref())?;
    let deadline = parse_optional_deadline(req.deadline.as_deref())?;

    let mut active: tasks::ActiveModel = task.into();
    if let Some(title) = non_blank(req.title.as_deref()) {
        active.title = Set(title.to_string());
    }
    if let Some(description) = non_blank(req.description.as_deref()) {
        active.description = Set(description.to_string());
    }
    if let Some(status) = status {
        active.status = Set(status);
    }
    if let Some(assignee) = req.assigned_to {
        active.assigned_to = Set(Some(assignee));
    }
    if let Some(deadline) = deadline {
        active.deadline = Set(Some(deadline));
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(&state.db)
        .await
        .with_context("Failed to update task")?;

    info!(task_id = %task_id, status = %updated.status, user_id = %user.id, "Task updated");

    let directory = load_users(&state.db, updated.assigned_to).await?;
    Ok(Json(TaskResponse::populate(updated, &directory)))
}

/// Delete a task in a project the caller belongs to.
pub async fn delete_task_handler(
    state: &AppState,
    user: AuthenticatedUser,
    task_id: Uuid,
) -> Result<Json<MessageResponse>> {
    let task = find_task(state, task_id).await?;

    AccessGuard::new(&state.db)
        .authorize(task.project_id, user.id)
        .await?;

    task.delete(&state.db).await?;

    info!(task_id = %task_id, user_id = %user.id, "Task deleted");

    Ok(Json(MessageResponse::new("Task removed")))
}

async fn find_task(state: &AppState, task_id: Uuid) -> Result<tasks::Model> {
    TasksEntity::find_by_id(task_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found"))
}
