//! # Request Handlers
//!
//! One module per resource. Each handler takes the application state and the
//! authenticated user explicitly and returns an [`error::Result`]; the
//! extractor plumbing lives in [`crate::router`].
//!
//! Every project-scoped handler authorizes through [`::auth::AccessGuard`]
//! before touching the resource.

pub mod analytics;
pub mod auth;
pub mod files;
pub mod messages;
pub mod projects;
pub mod tasks;
pub mod users;

use std::collections::HashMap;

use entity::{project_members, projects as project_entity, users as user_entity};
use error::Result;
use sea_orm::{
    ColumnTrait,
    Condition,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    sea_query::Query,
};
use uuid::Uuid;

use crate::dto::projects::ProjectResponse;

/// Users by id, for populating references.
pub type UserDirectory = HashMap<Uuid, user_entity::Model>;

/// Load the users named by `ids`. Unknown ids are simply absent.
pub async fn load_users(db: &DatabaseConnection, ids: impl IntoIterator<Item = Uuid>) -> Result<UserDirectory> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = user_entity::Entity::find()
        .filter(user_entity::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(users.into_iter().map(|user| (user.id, user)).collect())
}

/// Titles of the given projects. Deleted projects are absent.
pub async fn project_titles(db: &DatabaseConnection, ids: impl IntoIterator<Item = Uuid>) -> Result<HashMap<Uuid, String>> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let titles = project_entity::Entity::find()
        .select_only()
        .column(project_entity::Column::Id)
        .column(project_entity::Column::Title)
        .filter(project_entity::Column::Id.is_in(ids))
        .into_tuple::<(Uuid, String)>()
        .all(db)
        .await?;

    Ok(titles.into_iter().collect())
}

/// Condition matching projects `user_id` created or is a member of.
pub fn visible_to(user_id: Uuid) -> Condition {
    Condition::any()
        .add(project_entity::Column::CreatedBy.eq(user_id))
        .add(
            project_entity::Column::Id.in_subquery(
                Query::select()
                    .column(project_members::Column::ProjectId)
                    .from(project_members::Entity)
                    .and_where(project_members::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        )
}

/// Projects visible to `user_id`, newest first.
pub async fn visible_projects(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<project_entity::Model>> {
    Ok(project_entity::Entity::find()
        .filter(visible_to(user_id))
        .order_by_desc(project_entity::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Ordered member lists for several projects at once.
pub async fn members_by_project(
    db: &DatabaseConnection,
    project_ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, Vec<Uuid>>> {
    let project_ids: Vec<Uuid> = project_ids.into_iter().collect();
    if project_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = project_members::Entity::find()
        .select_only()
        .column(project_members::Column::ProjectId)
        .column(project_members::Column::UserId)
        .filter(project_members::Column::ProjectId.is_in(project_ids))
        .order_by_asc(project_members::Column::Id)
        .into_tuple::<(Uuid, Uuid)>()
        .all(db)
        .await?;

    let mut members: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (project_id, user_id) in rows {
        members.entry(project_id).or_default().push(user_id);
    }
    Ok(members)
}

/// Populate a single project with its members and creator.
pub async fn populate_project(db: &DatabaseConnection, project: project_entity::Model, members: &[Uuid]) -> Result<ProjectResponse> {
    let directory = load_users(
        db,
        members
            .iter()
            .copied()
            .chain(std::iter::once(project.created_by)),
    )
    .await?;

    Ok(ProjectResponse::populate(project, members, &directory))
}
