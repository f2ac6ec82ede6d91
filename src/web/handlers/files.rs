//! Upload, listing and deletion handlers.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::store::Upload;
use crate::web::dto::{FileListResponse, MessageResponse, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::FiledropError;

/// Multipart field names accepted for the file part.
const FILE_FIELDS: &[&str] = &["myFile", "file"];

fn multipart_error(state: &AppState, e: axum::extract::multipart::MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::from(FiledropError::TooLarge {
            size: state.max_file_size.saturating_add(1),
            limit: state.max_file_size,
        });
    }
    tracing::warn!("Failed to read multipart field: {}", e);
    ApiError::bad_request("Error: Invalid multipart data")
}

/// POST /upload - Store a file with an optional description.
///
/// Request body: multipart/form-data with a `myFile` (or `file`) part and an
/// optional `description` field.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected upload body: {}", e);
        ApiError::bad_request("Error: Expected multipart/form-data")
    })?;

    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&state, e))?
    {
        let name = field.name().unwrap_or("").to_string();

        if FILE_FIELDS.contains(&name.as_str()) {
            upload.original_name = field.file_name().map(|s| s.to_string());
            upload.content_type = field.content_type().map(|s| s.to_string());
            upload.content = Some(field.bytes().await.map_err(|e| multipart_error(&state, e))?);
        } else if name == "description" {
            upload.description = Some(field.text().await.map_err(|e| multipart_error(&state, e))?);
        }
    }

    let stored = state.store.put(upload).await?;

    Ok(Json(UploadResponse::new(stored.url)))
}

/// GET /api/files - List stored files with descriptions.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.store.list().await?;
    Ok(Json(FileListResponse::new(files)))
}

/// DELETE /api/files/:filename - Delete a stored file and its description.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete(&filename).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}
