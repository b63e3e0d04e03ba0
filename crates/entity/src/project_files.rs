//! Project Files Entity
//!
//! File attachments stored inline. Listing queries select [`FileMeta`] so
//! the content column is only read on download.

use sea_orm::{FromQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// Largest accepted attachment, in bytes (3 MiB).
pub const MAX_FILE_SIZE_BYTES: i64 = 3 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:           Uuid,
    pub project_id:   Uuid,
    pub uploaded_by:  Uuid,
    pub name:         String,
    pub content_type: String,
    pub size:         i64,
    #[sea_orm(column_type = "Blob")]
    #[serde(skip)]
    pub data:         Vec<u8>,
    pub created_at:   DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Every column except the file content.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct FileMeta {
    pub id:           Uuid,
    pub project_id:   Uuid,
    pub uploaded_by:  Uuid,
    pub name:         String,
    pub content_type: String,
    pub size:         i64,
    pub created_at:   DateTimeUtc,
}

impl FileMeta {
    pub const COLUMNS: [Column; 7] = [
        Column::Id,
        Column::ProjectId,
        Column::UploadedBy,
        Column::Name,
        Column::ContentType,
        Column::Size,
        Column::CreatedAt,
    ];
}

impl From<Model> for FileMeta {
    fn from(model: Model) -> Self {
        Self {
            id:           model.id,
            project_id:   model.project_id,
            uploaded_by:  model.uploaded_by,
            name:         model.name,
            content_type: model.content_type,
            size:         model.size,
            created_at:   model.created_at,
        }
    }
}
