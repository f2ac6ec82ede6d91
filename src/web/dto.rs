//! Response DTOs for the JSON API.

use serde::Serialize;

use crate::store::Entry;

/// `POST /upload` success body.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub ok: bool,
    /// Public URL of the stored file.
    pub url: String,
}

/// `GET /api/files` success body.
#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub ok: bool,
    pub files: Vec<Entry>,
}

/// Generic `{ok, message}` body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub ok: bool,
    pub message: String,
}

impl UploadResponse {
    pub fn new(url: String) -> Self {
        Self { ok: true, url }
    }
}

impl FileListResponse {
    pub fn new(files: Vec<Entry>) -> Self {
        Self { ok: true, files }
    }
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }
}
