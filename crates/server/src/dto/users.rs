//! # Profile Data Transfer Objects
//!
//! The "my profile" page: account details, activity counters and recent
//! history. History entries name their project by title, falling back to
//! [`UNKNOWN_PROJECT`] when the project has been deleted.

use analytics::ActivityStats;
use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::TaskStatus;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;

/// Title shown for history entries whose project no longer exists.
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

/// How many entries each history list carries.
pub const HISTORY_LIMIT: u64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHistoryEntry {
    pub id:            Uuid,
    pub title:         String,
    pub status:        TaskStatus,
    pub project_title: String,
    pub updated_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHistoryEntry {
    pub id:            Uuid,
    pub message:       String,
    pub project_title: String,
    pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHistoryEntry {
    pub id:            Uuid,
    pub name:          String,
    pub size:          i64,
    pub content_type:  String,
    pub project_title: String,
    pub created_at:    DateTime<Utc>,
}

/// Most recent activity, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileHistory {
    pub tasks:    Vec<TaskHistoryEntry>,
    pub messages: Vec<MessageHistoryEntry>,
    pub files:    Vec<FileHistoryEntry>,
}

/// Response for `GET /api/users/me/profile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResponse {
    pub user:    AuthenticatedUser,
    pub stats:   ActivityStats,
    pub history: ProfileHistory,
}
