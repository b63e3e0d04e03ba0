//! # Task Data Transfer Objects

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::{sea_orm_active_enums::TaskStatus, tasks, users};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{UserRef, blank_as_none};

/// Request to create a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(max = 200, message = "Title must not exceed 200 characters"))]
    pub title:       Option<String>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    /// One of `To Do`, `In Progress`, `Completed`; defaults to `To Do`
    pub status:      Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub assigned_to: Option<Uuid>,
    #[serde(deserialize_with = "blank_as_none")]
    pub project_id:  Option<Uuid>,
    pub deadline:    Option<String>,
}

/// Partial task update; only non-blank fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(max = 200, message = "Title must not exceed 200 characters"))]
    pub title:       Option<String>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    pub status:      Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub assigned_to: Option<Uuid>,
    pub deadline:    Option<String>,
}

/// A task with its assignee populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[serde(rename = "_id")]
    pub id:          Uuid,
    pub title:       String,
    pub description: String,
    pub status:      TaskStatus,
    pub assigned_to: Option<UserRef>,
    pub project_id:  Uuid,
    pub deadline:    Option<DateTime<Utc>>,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

impl TaskResponse {
    pub fn populate(task: tasks::Model, directory: &HashMap<Uuid, users::Model>) -> Self {
        Self {
            id:          task.id,
            title:       task.title,
            description: task.description,
            status:      task.status,
            assigned_to: task
                .assigned_to
                .and_then(|id| directory.get(&id))
                .map(UserRef::contact),
            project_id:  task.project_id,
            deadline:    task.deadline,
            created_at:  task.created_at,
            updated_at:  task.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_camel_case() {
        let project_id = Uuid::new_v4();
        let req: CreateTaskRequest = serde_json::from_str(&format!(
            r#"{{"title": "Write docs", "projectId": "{}", "assignedTo": "", "status": "In Progress"}}"#,
            project_id
        ))
        .unwrap();

        assert_eq!(req.project_id, Some(project_id));
        assert_eq!(req.assigned_to, None);
        assert_eq!(req.status.as_deref(), Some("In Progress"));
    }

    #[test]
    fn test_response_serializes_status_label() {
        let now = Utc::now();
        let task = tasks::Model {
            id:          Uuid::new_v4(),
            title:       "Ship".to_string(),
            description: String::new(),
            status:      TaskStatus::InProgress,
            assigned_to: Some(Uuid::new_v4()),
            project_id:  Uuid::new_v4(),
            deadline:    None,
            created_at:  now,
            updated_at:  now,
        };

        let json = serde_json::to_value(TaskResponse::populate(task, &HashMap::new())).unwrap();
        assert_eq!(json["status"], "In Progress");
        assert!(json["assignedTo"].is_null());
        assert!(json.get("projectId").is_some());
    }
}
