//! # Project Data Transfer Objects

use std::collections::HashMap;

use analytics::{CompletionStats, OverviewSummary};
use chrono::{DateTime, Utc};
use entity::{projects, users};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{UserRef, files::FileResponse, messages::ChatMessageResponse};

/// Request to create a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct CreateProjectRequest {
    #[validate(length(max = 200, message = "Title must not exceed 200 characters"))]
    pub title:       Option<String>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    /// The creator is added when absent
    pub members:     Option<Vec<Uuid>>,
    pub deadline:    Option<String>,
}

/// Partial update; blank fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateProjectRequest {
    #[validate(length(max = 200, message = "Title must not exceed 200 characters"))]
    pub title:       Option<String>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    /// Replaces the whole member list when present
    pub members:     Option<Vec<Uuid>>,
    pub deadline:    Option<String>,
}

/// Request to add a member by email
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddMemberRequest {
    pub email: Option<String>,
}

/// A project with its members and creator populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[serde(rename = "_id")]
    pub id:          Uuid,
    pub title:       String,
    pub description: String,
    /// Members in the order they were added, with roles
    pub members:     Vec<UserRef>,
    /// `null` when the creator's account no longer exists
    pub created_by:  Option<UserRef>,
    pub deadline:    Option<DateTime<Utc>>,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

impl ProjectResponse {
    /// Populate `project` from `directory`. Member ids with no matching user
    /// are dropped.
    pub fn populate(project: projects::Model, members: &[Uuid], directory: &HashMap<Uuid, users::Model>) -> Self {
        Self {
            id:          project.id,
            title:       project.title,
            description: project.description,
            members:     members
                .iter()
                .filter_map(|id| directory.get(id))
                .map(UserRef::with_role)
                .collect(),
            created_by:  directory.get(&project.created_by).map(UserRef::contact),
            deadline:    project.deadline,
            created_at:  project.created_at,
            updated_at:  project.updated_at,
        }
    }
}

/// Response for the project overview page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverviewResponse {
    pub project:         ProjectResponse,
    pub summary:         OverviewSummary,
    pub completion:      CompletionStats,
    pub recent_messages: Vec<ChatMessageResponse>,
    pub recent_files:    Vec<FileResponse>,
}

#[cfg(test)]
mod tests {
    use entity::sea_orm_active_enums::UserRole;

    use super::*;

    fn user(name: &str, role: UserRole) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: String::new(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_populate_drops_unknown_members() {
        let admin = user("Admin", UserRole::Admin);
        let dev = user("Dev", UserRole::Developer);
        let now = Utc::now();
        let project = projects::Model {
            id:          Uuid::new_v4(),
            title:       "Apollo".to_string(),
            description: String::new(),
            created_by:  admin.id,
            deadline:    None,
            created_at:  now,
            updated_at:  now,
        };
        let directory = HashMap::from([(admin.id, admin.clone()), (dev.id, dev.clone())]);

        let response = ProjectResponse::populate(project, &[admin.id, Uuid::new_v4(), dev.id], &directory);

        assert_eq!(response.members.len(), 2);
        assert_eq!(response.members[1].name, "Dev");
        assert_eq!(response.members[1].role, Some(UserRole::Developer));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["createdBy"]["name"], "Admin");
        assert!(json["createdBy"].get("role").is_none());
        assert!(json["deadline"].is_null());
    }

    #[test]
    fn test_update_request_members_optional() {
        let req: UpdateProjectRequest = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("New"));
        assert!(req.members.is_none());
    }
}
