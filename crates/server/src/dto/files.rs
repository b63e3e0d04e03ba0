//! # File Attachment Data Transfer Objects
//!
//! Uploads arrive as base64 in a JSON body; responses never include the
//! content, which is only served by the download endpoint.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::{project_files::FileMeta, users};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserRef;

/// Request to upload a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadFileRequest {
    pub name:         Option<String>,
    pub content_type: Option<String>,
    /// Declared size in bytes; must match the decoded content
    pub size:         Option<i64>,
    /// Plain base64, optionally with a `data:<type>;base64,` prefix
    pub data_base64:  Option<String>,
}

/// File metadata with the uploader populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    #[serde(rename = "_id")]
    pub id:           Uuid,
    pub project_id:   Uuid,
    pub uploaded_by:  Option<UserRef>,
    pub name:         String,
    pub content_type: String,
    pub size:         i64,
    pub created_at:   DateTime<Utc>,
}

impl FileResponse {
    pub fn populate(file: FileMeta, directory: &HashMap<Uuid, users::Model>) -> Self {
        Self {
            id:           file.id,
            project_id:   file.project_id,
            uploaded_by:  directory.get(&file.uploaded_by).map(UserRef::with_role),
            name:         file.name,
            content_type: file.content_type,
            size:         file.size,
            created_at:   file.created_at,
        }
    }
}
