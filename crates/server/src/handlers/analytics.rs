//! # Analytics Handlers
//!
//! Fetch and authorize here; all counting is done by the `analytics` crate.

use std::collections::HashMap;

use analytics::{PortfolioOverview, ProjectAnalytics, portfolio_overview, project_analytics};
use auth::AccessGuard;
use axum::Json;
use chrono::Utc;
use entity::tasks::{self, Column as TaskColumn, Entity as TasksEntity};
use error::Result;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::{load_users, visible_projects};
use crate::{AppState, middleware::auth::AuthenticatedUser};

/// Completion stats, team performance and the seven-day trend for a project.
pub async fn project_analytics_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: Uuid,
) -> Result<Json<ProjectAnalytics>> {
    AccessGuard::new(&state.db)
        .authorize(project_id, user.id)
        .await?;

    // Creation order keeps the team breakdown stable between requests
    let project_tasks: Vec<tasks::Model> = TasksEntity::find()
        .filter(TaskColumn::ProjectId.eq(project_id))
        .order_by_asc(TaskColumn::CreatedAt)
        .all(&state.db)
        .await?;

    let names: HashMap<Uuid, String> = load_users(
        &state.db,
        project_tasks
            .iter()
            .filter_map(|t| t.assigned_to)
            .collect::<Vec<_>>(),
    )
    .await?
    .into_iter()
    .map(|(id, user)| (id, user.name))
    .collect();

    Ok(Json(project_analytics(
        project_id,
        &project_tasks,
        &names,
        Utc::now(),
    )))
}

/// Completion across every project the caller can see.
pub async fn overview_analytics_handler(state: &AppState, user: AuthenticatedUser) -> Result<Json<PortfolioOverview>> {
    let projects = visible_projects(&state.db, user.id).await?;

    let project_tasks = if projects.is_empty() {
        Vec::new()
    }
    else {
        TasksEntity::find()
            .filter(TaskColumn::ProjectId.is_in(projects.iter().map(|p| p.id)))
            .all(&state.db)
            .await?
    };

    Ok(Json(portfolio_overview(&projects, &project_tasks)))
}
