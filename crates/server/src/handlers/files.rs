//! # Project File Handlers
//!
//! Attachments up to [`MAX_FILE_SIZE_BYTES`] are uploaded as base64 inside a
//! JSON body and stored inline. Listings never read the content column.

use auth::{AccessGuard, require_admin_or_uploader};
use axum::{
    Json,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use chrono::Utc;
use entity::project_files::{self, Column as FileColumn, Entity as FilesEntity, FileMeta, MAX_FILE_SIZE_BYTES};
use error::{AppError, MessageResponse, Result, ResultExt as _};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use tracing::info;
use uuid::Uuid;

use super::load_users;
use crate::{
    AppState,
    dto::{
        files::{FileResponse, UploadFileRequest},
        non_blank,
    },
    middleware::auth::AuthenticatedUser,
};

pub const MAX_NAME_CHARS: usize = 160;
pub const MAX_CONTENT_TYPE_CHARS: usize = 120;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

const MISSING_FIELDS: &str = "name, contentType, size and dataBase64 are required";
const INVALID_SIZE: &str = "Invalid file size. Maximum allowed is 3MB";
const INVALID_PAYLOAD: &str = "Invalid file payload. Maximum allowed is 3MB";
const SIZE_MISMATCH: &str = "File size does not match payload";

/// Standard alphabet, padding optional.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Characters escaped in download filenames: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const FILENAME_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Strip an optional `data:<type>;base64,` prefix and whitespace.
fn strip_data_url(payload: &str) -> String {
    let body = match payload.trim().strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, data)| data),
        None => payload.trim(),
    };
    body.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// Decode an upload payload, enforcing the size cap before and after.
fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let encoded = strip_data_url(payload);

    // Four base64 characters per three bytes, plus padding
    let max_encoded = (MAX_FILE_SIZE_BYTES as usize).div_ceil(3) * 4;
    if encoded.is_empty() || encoded.len() > max_encoded {
        return Err(AppError::bad_request(INVALID_PAYLOAD));
    }

    let data = BASE64
        .decode(encoded.as_bytes())
        .map_err(|_| AppError::bad_request(INVALID_PAYLOAD))?;

    if data.is_empty() || data.len() as i64 > MAX_FILE_SIZE_BYTES {
        return Err(AppError::bad_request(INVALID_PAYLOAD));
    }
    Ok(data)
}

fn truncate_chars(value: &str, max: usize) -> String { value.chars().take(max).collect() }

/// `attachment; filename="<percent-encoded name>"`
fn content_disposition(name: &str) -> String {
    format!(
        "attachment; filename=\"{}\"",
        utf8_percent_encode(name, FILENAME_ESCAPE)
    )
}

/// Upload a file to a project the caller belongs to.
pub async fn upload_file_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: Uuid,
    req: UploadFileRequest,
) -> Result<FileResponse> {
    AccessGuard::new(&state.db)
        .authorize(project_id, user.id)
        .await?;

    let (Some(name), Some(content_type), Some(size), Some(payload)) = (
        non_blank(req.name.as_deref()),
        non_blank(req.content_type.as_deref()),
        req.size.filter(|size| *size != 0),
        non_blank(req.data_base64.as_deref()),
    )
    else {
        return Err(AppError::bad_request(MISSING_FIELDS));
    };

    if size < 0 || size > MAX_FILE_SIZE_BYTES {
        return Err(AppError::bad_request(INVALID_SIZE));
    }

    let data = decode_payload(payload)?;
    if data.len() as i64 != size {
        return Err(AppError::bad_request(SIZE_MISMATCH));
    }

    let file = project_files::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        uploaded_by: Set(user.id),
        name: Set(truncate_chars(name, MAX_NAME_CHARS)),
        content_type: Set(truncate_chars(content_type, MAX_CONTENT_TYPE_CHARS)),
        size: Set(size),
        data: Set(data),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await
    .with_context("Failed to store file")?;

    info!(file_id = %file.id, project_id = %project_id, user_id = %user.id, size = file.size, "File uploaded");

    let directory = load_users(&state.db, [user.id]).await?;
    Ok(FileResponse::populate(FileMeta::from(file), &directory))
}

/// File metadata for a project, newest first.
pub async fn list_files_handler(
    state: &AppState,
    user: AuthenticatedUser,
    project_id: Uuid,
) -> Result<Json<Vec<FileResponse>>> {
    AccessGuard::new(&state.db)
        .authorize(project_id, user.id)
        .await?;

    let files = FilesEntity::find()
        .select_only()
        .columns(FileMeta::COLUMNS)
        .filter(FileColumn::ProjectId.eq(project_id))
        .order_by_desc(FileColumn::CreatedAt)
        .into_model::<FileMeta>()
        .all(&state.db)
        .await?;

    let directory = load_users(&state.db, files.iter().map(|f| f.uploaded_by).collect::<Vec<_>>()).await?;

    Ok(Json(
        files
            .into_iter()
            .map(|file| FileResponse::populate(file, &directory))
            .collect(),
    ))
}

/// Raw file content as an attachment.
pub async fn download_file_handler(state: &AppState, user: AuthenticatedUser, file_id: Uuid) -> Result<Response> {
    let file = FilesEntity::find_by_id(file_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("File not found"))?;

    AccessGuard::new(&state.db)
        .authorize(file.project_id, user.id)
        .await?;

    let content_type = non_blank(Some(file.content_type.as_str()))
        .and_then(|value| HeaderValue::from_str(value).ok())
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    let disposition = HeaderValue::from_str(&content_disposition(&file.name))
        .map_err(|e| AppError::internal(format!("Invalid Content-Disposition: {}", e)))?;

    tracing::debug!(file_id = %file_id, user_id = %user.id, "File downloaded");

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.data,
    )
        .into_response())
}

/// Delete a file. Admins may delete any file; others only their own uploads.
pub async fn delete_file_handler(
    state: &AppState,
    user: AuthenticatedUser,
    file_id: Uuid,
) -> Result<Json<MessageResponse>> {
    let file = FilesEntity::find_by_id(file_id)
        .select_only()
        .columns(FileMeta::COLUMNS)
        .into_model::<FileMeta>()
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("File not found"))?;

    AccessGuard::new(&state.db)
        .authorize(file.project_id, user.id)
        .await?;
    require_admin_or_uploader(user.role, user.id, file.uploaded_by)?;

    FilesEntity::delete_by_id(file_id)
        .exec(&state.db)
        .await?;

    info!(file_id = %file_id, project_id = %file.project_id, user_id = %user.id, "File deleted");

    Ok(Json(MessageResponse::new("File deleted")))
}
