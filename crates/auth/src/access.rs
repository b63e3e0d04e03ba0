//! # Project Access Guard
//!
//! Every read or write of a project-scoped resource goes through
//! [`AccessGuard::authorize`], which reloads the project and its member list
//! and decides whether the requester may proceed. Denials are returned as
//! [`AccessDenied`] values rather than HTTP responses so the rules can be
//! tested without a server.
//!
//! Membership is `user == project.created_by || user ∈ members`: the creator
//! is always let in, even if absent from the member list.

use entity::{project_members, projects, sea_orm_active_enums::UserRole};
use error::AppError;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use thiserror::Error;
use uuid::Uuid;

/// Creator-only operations, named in the denial message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatorAction {
    Update,
    Delete,
    ManageMembers,
}

impl CreatorAction {
    fn describe(self) -> &'static str {
        match self {
            CreatorAction::Update => "update project",
            CreatorAction::Delete => "delete project",
            CreatorAction::ManageMembers => "manage members",
        }
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("Project not found")]
    ProjectNotFound,

    #[error("You do not have access to this project")]
    NotMember,

    #[error("You do not have access to this project chat")]
    NotChatMember,

    #[error("Only project creator can {}", .0.describe())]
    NotCreator(CreatorAction),

    #[error("Only admin or uploader can delete this file")]
    NotAdminOrUploader,

    #[error("Forbidden: insufficient role")]
    InsufficientRole,
}

impl AccessDenied {
    /// HTTP status the denial maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessDenied::ProjectNotFound => 404,
            _ => 403,
        }
    }
}

impl From<AccessDenied> for AppError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::ProjectNotFound => AppError::not_found(denied),
            other => AppError::forbidden(other),
        }
    }
}

/// Failure of [`AccessGuard::authorize`]: a denial, or the store could not be read.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),

    #[error("Access check failed: {0}")]
    Store(#[from] DbErr),
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Denied(denied) => denied.into(),
            AccessError::Store(db_err) => db_err.into(),
        }
    }
}

/// Which denial message a non-member receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessScope {
    #[default]
    Project,
    Chat,
}

/// An authorized project together with its ordered member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAccess {
    pub project: projects::Model,
    pub members: Vec<Uuid>,
}

impl ProjectAccess {
    /// Distinct members plus the creator, in member-list order with the
    /// creator last when not listed.
    pub fn participants(&self) -> Vec<Uuid> {
        let mut participants = self.members.clone();
        if !participants.contains(&self.project.created_by) {
            participants.push(self.project.created_by);
        }
        participants
    }
}

/// Membership predicate: the creator or anyone in `members`.
#[inline]
pub fn is_member(created_by: Uuid, members: &[Uuid], user_id: Uuid) -> bool {
    created_by == user_id || members.contains(&user_id)
}

/// Decide access for an already-fetched project.
pub fn check_access(
    project: Option<projects::Model>,
    members: Vec<Uuid>,
    user_id: Uuid,
    scope: AccessScope,
) -> Result<ProjectAccess, AccessDenied> {
    let project = project.ok_or(AccessDenied::ProjectNotFound)?;

    if !is_member(project.created_by, &members, user_id) {
        return Err(match scope {
            AccessScope::Project => AccessDenied::NotMember,
            AccessScope::Chat => AccessDenied::NotChatMember,
        });
    }

    Ok(ProjectAccess {
        project,
        members,
    })
}

/// Stricter check for creator-only operations.
pub fn require_creator(project: &projects::Model, user_id: Uuid, action: CreatorAction) -> Result<(), AccessDenied> {
    if project.created_by == user_id {
        Ok(())
    }
    else {
        Err(AccessDenied::NotCreator(action))
    }
}

/// File deletion is open to admins and to whoever uploaded the file.
pub fn require_admin_or_uploader(role: UserRole, user_id: Uuid, uploaded_by: Uuid) -> Result<(), AccessDenied> {
    if role == UserRole::Admin || user_id == uploaded_by {
        Ok(())
    }
    else {
        Err(AccessDenied::NotAdminOrUploader)
    }
}

/// Role gate for endpoints restricted to particular account roles.
pub fn require_role(role: UserRole, allowed: &[UserRole]) -> Result<(), AccessDenied> {
    if allowed.contains(&role) {
        Ok(())
    }
    else {
        Err(AccessDenied::InsufficientRole)
    }
}

/// Ordered member ids of a project.
pub async fn member_ids(db: &DatabaseConnection, project_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
    project_members::Entity::find()
        .select_only()
        .column(project_members::Column::UserId)
        .filter(project_members::Column::ProjectId.eq(project_id))
        .order_by_asc(project_members::Column::Id)
        .into_tuple::<Uuid>()
        .all(db)
        .await
}

/// Loads projects and decides whether a user may act on them.
#[derive(Debug, Clone, Copy)]
pub struct AccessGuard<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AccessGuard<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
        }
    }

    /// Authorize `user_id` for `project_id`, returning the project on success.
    pub async fn authorize(&self, project_id: Uuid, user_id: Uuid) -> Result<ProjectAccess, AccessError> {
        self.authorize_scoped(project_id, user_id, AccessScope::Project)
            .await
    }

    /// As [`AccessGuard::authorize`], with the chat-specific denial message.
    pub async fn authorize_chat(&self, project_id: Uuid, user_id: Uuid) -> Result<ProjectAccess, AccessError> {
        self.authorize_scoped(project_id, user_id, AccessScope::Chat)
            .await
    }

    async fn authorize_scoped(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        scope: AccessScope,
    ) -> Result<ProjectAccess, AccessError> {
        let project = projects::Entity::find_by_id(project_id)
            .one(self.db)
            .await?;
        let members = match project {
            Some(_) => member_ids(self.db, project_id).await?,
            None => Vec::new(),
        };

        let access = check_access(project, members, user_id, scope);
        if let Err(ref denied) = access {
            tracing::debug!(project_id = %project_id, user_id = %user_id, reason = %denied, "Project access denied");
        }
        Ok(access?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn project(created_by: Uuid) -> projects::Model {
        let now = Utc::now();
        projects::Model {
            id: Uuid::new_v4(),
            title: "Apollo".to_string(),
            description: String::new(),
            created_by,
            deadline: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_membership_is_creator_or_listed() {
        let (u1, u2, u3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        assert!(is_member(u1, &[u2], u1));
        assert!(is_member(u1, &[u2], u2));
        assert!(!is_member(u1, &[u2], u3));
    }

    #[test]
    fn test_check_access_outcomes() {
        let (u1, u2, u3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let access = check_access(Some(project(u1)), vec![u2], u1, AccessScope::Project).unwrap();
        assert_eq!(access.project.created_by, u1);
        assert_eq!(access.members, vec![u2]);

        assert!(check_access(Some(project(u1)), vec![u2], u2, AccessScope::Project).is_ok());
        assert_eq!(
            check_access(Some(project(u1)), vec![u2], u3, AccessScope::Project),
            Err(AccessDenied::NotMember)
        );
        assert_eq!(
            check_access(Some(project(u1)), vec![u2], u3, AccessScope::Chat),
            Err(AccessDenied::NotChatMember)
        );
        assert_eq!(
            check_access(None, Vec::new(), u1, AccessScope::Project),
            Err(AccessDenied::ProjectNotFound)
        );
    }

    #[test]
    fn test_require_creator() {
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let p = project(u1);

        assert!(require_creator(&p, u1, CreatorAction::Delete).is_ok());
        let denied = require_creator(&p, u2, CreatorAction::Delete).unwrap_err();
        assert_eq!(denied.to_string(), "Only project creator can delete project");
        assert_eq!(
            AccessDenied::NotCreator(CreatorAction::ManageMembers).to_string(),
            "Only project creator can manage members"
        );
        assert_eq!(
            AccessDenied::NotCreator(CreatorAction::Update).to_string(),
            "Only project creator can update project"
        );
    }

    #[test]
    fn test_require_admin_or_uploader() {
        let (uploader, other) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(require_admin_or_uploader(UserRole::Developer, uploader, uploader).is_ok());
        assert!(require_admin_or_uploader(UserRole::Admin, other, uploader).is_ok());
        assert_eq!(
            require_admin_or_uploader(UserRole::Viewer, other, uploader),
            Err(AccessDenied::NotAdminOrUploader)
        );
    }

    #[test]
    fn test_require_role() {
        assert!(require_role(UserRole::Admin, &[UserRole::Admin]).is_ok());
        assert_eq!(
            require_role(UserRole::Developer, &[UserRole::Admin]),
            Err(AccessDenied::InsufficientRole)
        );
    }

    #[test]
    fn test_denial_status_mapping() {
        let not_found: AppError = AccessDenied::ProjectNotFound.into();
        assert_eq!(not_found.status(), 404);
        assert_eq!(not_found.message(), "Project not found");

        let forbidden: AppError = AccessDenied::NotMember.into();
        assert_eq!(forbidden.status(), 403);
        assert_eq!(AccessDenied::NotAdminOrUploader.status_code(), 403);
    }

    #[test]
    fn test_participants_adds_unlisted_creator() {
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let access = ProjectAccess {
            project: project(u1),
            members: vec![u2],
        };
        assert_eq!(access.participants(), vec![u2, u1]);

        let listed = ProjectAccess {
            project: project(u1),
            members: vec![u1, u2],
        };
        assert_eq!(listed.participants(), vec![u1, u2]);
    }
}
