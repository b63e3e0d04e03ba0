//! # Project Handlers
//!
//! Project CRUD, member management and the overview page. Creating and
//! changing projects is limited to admins, and changes additionally to the
//! project's creator.

use analytics::project_overview;
use auth::{AccessGuard, CreatorAction, require_creator, require_role};
use axum::Json;
use chrono::Utc;
use entity::{
    messages,
    project_files::{self, FileMeta},
    project_members,
    projects::{self, Entity as ProjectsEntity},
    sea_orm_active_enums::UserRole,
    tasks,
    users::{self, normalize_email},
};
use error::{AppError, DbResultExt as _, MessageResponse, Result, ResultExt as _};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseConnection,
    EntityTrait,
    ModelTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{load_users, members_by_project, populate_project, visible_projects};
use crate::{
    AppState,
    dto::{
        files::FileResponse,
        messages::ChatMessageResponse,
        non_blank,
        parse_optional_deadline,
        projects::{AddMemberRequest, CreateProjectRequest, ProjectOverviewResponse, ProjectResponse, UpdateProjectRequest},
    },
    middleware::auth::AuthenticatedUser,
};

const PROJECT_ADMINS: &[UserRole] = &[UserRole::Admin];

/// Projects the caller created or belongs to, newest first.
pub async fn list_projects_handler(state: &AppState, user: AuthenticatedUser) -> Result<Json<Vec<ProjectResponse>>> {
    let projects = visible_projects(&state.db, user.id).await?;
    let mut members = members_by_project(&state.db, projects.iter().map(|p| p.id)).await?;

    let directory = load_users(
        &state.db,
        projects
            .iter()
            .map(|p| p.created_by)
            .chain(members.values().flatten().copied())
            .collect::<Vec<_>>(),
    )
    .await?;

    let responses = projects
        .into_iter()
        .map(|project| {
            let project_members = members.remove(&project.id).unwrap_or_default();
            ProjectResponse::populate(project, &project_members, &directory)
        })
        .collect();

    Ok(Json(responses))
}

/// Create a project. The creator is always added to the member list.
pub async fn create_project_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateProjectRequest,
) -> Result<ProjectResponse> {
    require_role(user.role, PROJECT_ADMINS)?;

    let title = non_blank(req.title.as_deref())
        .ok_or_else(|| AppError::bad_request("Title is required"))?
        .to_string();
    req.validate()?;
    let deadline = parse_optional_deadline(req.deadline.as_deref())?;

    let mut member_ids = dedup_members(req.members.unwrap_or_default());
    if !member_ids.contains(&user.id) {
        member_ids.push(user.id);
    }
    ensure_users_exist(&state.db, &member_ids).await?;

    let now = Utc::now();
    let txn = state.db.begin().await?;

    let project = projects::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        description: Set(req.description.unwrap_or_default().trim().to_string()),
        created_by: Set(user.id),
        deadline: Set(deadline),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await
    .with_context("Failed to create project")?;

    insert_members(&txn, project.id, &member_ids).await?;
    txn.commit().await?;

    info!(project_id = %project.id, user_id = %user.id, members = member_ids.len(), "Project created");

    populate_project(&state.db, project, &member_ids).await
}

/// A single project, for members only.
pub async fn get_project_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: Uuid,
) -> Result<Json<ProjectResponse>> {
    let access = AccessGuard::new(&state.db)
        .authorize(project_id, user.id)
        .await?;

    Ok(Json(
        populate_project(&state.db, access.project, &access.members).await?,
    ))
}

/// Partial update by the creator. Blank fields keep their value; `members`
/// replaces the whole list.
pub async fn update_project_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: Uuid,
    req: UpdateProjectRequest,
) -> Result<Json<ProjectResponse>> {
    require_role(user.role, PROJECT_ADMINS)?;
    req.validate()?;

    let (project, mut member_ids) = load_for_creator(&state.db, project_id, user.id, CreatorAction::Update).await?;
    let deadline = parse_optional_deadline(req.deadline.as_deref())?;

    let replacement = req.members.map(dedup_members);
    if let Some(ref ids) = replacement {
        ensure_users_exist(&state.db, ids).await?;
    }

    let txn = state.db.begin().await?;

    let mut active: projects::ActiveModel = project.into();
    if let Some(title) = non_blank(req.title.as_deref()) {
        active.title = Set(title.to_string());
    }
    if let Some(description) = non_blank(req.description.as_deref()) {
        active.description = Set(description.to_string());
    }
    if let Some(deadline) = deadline {
        active.deadline = Set(Some(deadline));
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(&txn)
        .await
        .with_context("Failed to update project")?;

    if let Some(ids) = replacement {
        project_members::Entity::delete_many()
            .filter(project_members::Column::ProjectId.eq(project_id))
            .exec(&txn)
            .await?;
        insert_members(&txn, project_id, &ids).await?;
        member_ids = ids;
    }
    txn.commit().await?;

    info!(project_id = %project_id, user_id = %user.id, "Project updated");

    Ok(Json(
        populate_project(&state.db, updated, &member_ids).await?,
    ))
}

/// Delete a project and its member list. Tasks, messages and files are left
/// in place.
pub async fn delete_project_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: Uuid,
) -> Result<Json<MessageResponse>> {
    require_role(user.role, PROJECT_ADMINS)?;

    let (project, _) = load_for_creator(&state.db, project_id, user.id, CreatorAction::Delete).await?;

    let txn = state.db.begin().await?;
    project_members::Entity::delete_many()
        .filter(project_members::Column::ProjectId.eq(project_id))
        .exec(&txn)
        .await?;
    project.delete(&txn).await?;
    txn.commit().await?;

    info!(project_id = %project_id, user_id = %user.id, "Project deleted");

    Ok(Json(MessageResponse::new("Project removed")))
}

/// Add a registered user to the project by email.
pub async fn add_member_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: Uuid,
    req: AddMemberRequest,
) -> Result<Json<ProjectResponse>> {
    require_role(user.role, PROJECT_ADMINS)?;

    let email = non_blank(req.email.as_deref())
        .map(normalize_email)
        .ok_or_else(|| AppError::bad_request("Email is required"))?;

    let (project, mut member_ids) =
        load_for_creator(&state.db, project_id, user.id, CreatorAction::ManageMembers).await?;

    let member = users::Entity::find()
        .filter(users::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User with this email not found"))?;

    if member_ids.contains(&member.id) {
        return Err(AppError::bad_request(
            "User is already a member of this project",
        ));
    }

    insert_members(&state.db, project_id, &[member.id]).await?;
    member_ids.push(member.id);

    info!(project_id = %project_id, user_id = %user.id, member_id = %member.id, "Project member added");

    Ok(Json(
        populate_project(&state.db, project, &member_ids).await?,
    ))
}

/// Summary counts, completion stats and the most recent chat and files.
pub async fn project_overview_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: Uuid,
) -> Result<Json<ProjectOverviewResponse>> {
    let access = AccessGuard::new(&state.db)
        .authorize(project_id, user.id)
        .await?;

    let project_tasks = tasks::Entity::find()
        .filter(tasks::Column::ProjectId.eq(project_id))
        .all(&state.db)
        .await?;
    let project_messages = messages::Entity::find()
        .filter(messages::Column::ProjectId.eq(project_id))
        .order_by_desc(messages::Column::CreatedAt)
        .all(&state.db)
        .await?;
    let project_files = project_files::Entity::find()
        .select_only()
        .columns(FileMeta::COLUMNS)
        .filter(project_files::Column::ProjectId.eq(project_id))
        .order_by_desc(project_files::Column::CreatedAt)
        .into_model::<FileMeta>()
        .all(&state.db)
        .await?;

    let overview = project_overview(
        &access.project,
        &access.members,
        &project_tasks,
        project_messages,
        project_files,
    );

    let directory = load_users(
        &state.db,
        access
            .participants()
            .into_iter()
            .chain(overview.recent_messages.iter().map(|m| m.sender))
            .chain(overview.recent_files.iter().map(|f| f.uploaded_by))
            .collect::<Vec<_>>(),
    )
    .await?;

    Ok(Json(ProjectOverviewResponse {
        project:         ProjectResponse::populate(access.project, &access.members, &directory),
        summary:         overview.summary,
        completion:      overview.completion,
        recent_messages: overview
            .recent_messages
            .into_iter()
            .map(|m| ChatMessageResponse::populate(m, &directory))
            .collect(),
        recent_files:    overview
            .recent_files
            .into_iter()
            .map(|f| FileResponse::populate(f, &directory))
            .collect(),
    }))
}

/// Load a project and its members, refusing anyone but the creator.
async fn load_for_creator(
    db: &DatabaseConnection,
    project_id: Uuid,
    user_id: Uuid,
    action: CreatorAction,
) -> Result<(projects::Model, Vec<Uuid>)> {
    let project = ProjectsEntity::find_by_id(project_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::from(auth::AccessDenied::ProjectNotFound))?;
    require_creator(&project, user_id, action)?;

    let members = auth::access::member_ids(db, project_id).await?;
    Ok((project, members))
}

/// Drop repeated ids, keeping first occurrences in order.
fn dedup_members(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

async fn ensure_users_exist(db: &DatabaseConnection, ids: &[Uuid]) -> Result<()> {
    let found = load_users(db, ids.iter().copied()).await?;
    if ids.iter().all(|id| found.contains_key(id)) {
        Ok(())
    }
    else {
        Err(AppError::not_found("User not found"))
    }
}

async fn insert_members<C: ConnectionTrait>(db: &C, project_id: Uuid, user_ids: &[Uuid]) -> Result<()> {
    if user_ids.is_empty() {
        return Ok(());
    }

    let now = Utc::now();
    let rows = user_ids.iter().map(|user_id| {
        project_members::ActiveModel {
            project_id: Set(project_id),
            user_id: Set(*user_id),
            created_at: Set(now),
            ..Default::default()
        }
    });

    project_members::Entity::insert_many(rows)
        .exec(db)
        .await
        .on_duplicate("User is already a member of this project")
        .with_context("Failed to add project members")?;
    Ok(())
}
