//! File store for filedrop.
//!
//! An entry is a content file named `<uuid>.<ext>` plus a companion
//! description `descriptions/<uuid>.txt`. The description is written after
//! `put` has already returned, so `list` can briefly report an entry with
//! [`DESCRIPTION_UNAVAILABLE`] before its description lands.

mod local;
pub mod policy;

pub use local::LocalFileStore;

use axum::async_trait;
use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use crate::Result;

/// Description stored when the uploader supplies none.
pub const DESCRIPTION_NOT_PROVIDED: &str = "No description provided";

/// Description reported when no description file exists.
pub const DESCRIPTION_UNAVAILABLE: &str = "No description available";

/// Name of the description partition inside the content directory.
pub const DESCRIPTIONS_DIR: &str = "descriptions";

/// An upload as received from a client.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// Client-side file name, used only for its extension.
    pub original_name: Option<String>,
    /// Declared media type.
    pub content_type: Option<String>,
    pub content: Option<Bytes>,
    pub description: Option<String>,
}

impl Upload {
    /// Create an upload with a file name and content.
    pub fn new(original_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            original_name: Some(original_name.into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Set the declared media type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Result of a successful `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: Uuid,
    /// Stored file name (`<id>.<ext>`).
    pub name: String,
    /// Public URL of the stored file.
    pub url: String,
}

/// A stored entry as reported by `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
}

/// Mapping from generated identifiers to uploaded content and descriptions.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Validate and persist an upload under a fresh identifier.
    ///
    /// Returns once the content is on disk. The description is written by a
    /// detached task; its failure is logged and never reported here.
    async fn put(&self, upload: Upload) -> Result<StoredFile>;

    /// Enumerate stored entries with their descriptions, sorted by name.
    async fn list(&self) -> Result<Vec<Entry>>;

    /// Delete an entry by stored name (`<id>.<ext>`) or bare identifier.
    ///
    /// Removal of the description file is best-effort.
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Build the public URL for a stored file name.
pub fn file_url(base_url: &str, name: &str) -> String {
    format!("{}/uploads/{}", base_url.trim_end_matches('/'), name)
}

/// Derive the description file name for a stored file name.
pub fn description_name(stored_name: &str) -> String {
    let stem = match stored_name.rfind('.') {
        Some(idx) if idx > 0 => &stored_name[..idx],
        _ => stored_name,
    };
    format!("{stem}.txt")
}
