//! Filesystem-backed file store.

use std::io;
use std::path::{Path, PathBuf};

use axum::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::{
    description_name, file_url, policy, Entry, FileStore, StoredFile, Upload,
    DESCRIPTIONS_DIR, DESCRIPTION_NOT_PROVIDED, DESCRIPTION_UNAVAILABLE,
};
use crate::config::Config;
use crate::{FiledropError, Result};

/// File store keeping content and descriptions in a directory tree:
///
/// ```text
/// {root}/
/// ├── 9b1d...e4.pdf
/// ├── c07a...11.png
/// └── descriptions/
///     ├── 9b1d...e4.txt
///     └── c07a...11.txt
/// ```
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
    base_url: String,
    max_file_size: u64,
}

impl LocalFileStore {
    /// Create a store rooted at `root`.
    ///
    /// The root and its description partition are created if missing.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>, max_file_size: u64) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join(DESCRIPTIONS_DIR))?;

        Ok(Self {
            root,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_file_size,
        })
    }

    /// Create a store from the application configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.storage.upload_dir,
            config.server.public_url.as_str(),
            config.storage.max_file_size,
        )
    }

    /// Get the content directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the description partition.
    pub fn descriptions_dir(&self) -> PathBuf {
        self.root.join(DESCRIPTIONS_DIR)
    }

    fn description_path(&self, stored_name: &str) -> PathBuf {
        self.descriptions_dir().join(description_name(stored_name))
    }

    async fn read_description(&self, stored_name: &str) -> String {
        let path = self.description_path(stored_name);
        match fs::read(&path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => DESCRIPTION_UNAVAILABLE.to_string(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read description");
                DESCRIPTION_UNAVAILABLE.to_string()
            }
        }
    }

    /// Find the stored file name for a stored name or bare identifier.
    async fn resolve(&self, name: &str) -> Result<String> {
        let not_found = || FiledropError::NotFound(format!("File {name}"));

        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(not_found());
        }
        let has_ext = name.contains('.');
        let Some(stem) = stored_id(name) else {
            return Err(not_found());
        };

        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => return Err(FiledropError::StoreUnavailable(e)),
        };
        while let Some(entry) = entries.next_entry().await? {
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            let matches = if has_ext {
                file_name == name
            } else {
                file_name.split_once('.').map(|(s, _)| s) == Some(stem)
            };
            if matches && entry.file_type().await?.is_file() {
                return Ok(file_name);
            }
        }

        Err(not_found())
    }
}

/// Identifier part of a stored name, if it has the `<uuid>[.<ext>]` shape.
fn stored_id(name: &str) -> Option<&str> {
    let stem = name.split_once('.').map_or(name, |(stem, _)| stem);
    Uuid::parse_str(stem).ok().map(|_| stem)
}

/// Write upload content, removing whatever was written if the write fails.
async fn write_content(path: &Path, content: &[u8]) -> Result<()> {
    let Err(e) = fs::write(path, content).await else {
        return Ok(());
    };
    if let Err(cleanup) = fs::remove_file(path).await {
        if cleanup.kind() != io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
        }
    }
    Err(e.into())
}

/// Write a description, creating the partition if needed.
async fn write_description(dir: PathBuf, stored_name: String, text: String) -> Result<()> {
    let path = dir.join(description_name(&stored_name));
    let write = async {
        fs::create_dir_all(&dir).await?;
        fs::write(&path, text).await
    };
    write
        .await
        .map_err(|source| FiledropError::DescriptionWriteFailed {
            name: stored_name,
            source,
        })
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(&self, upload: Upload) -> Result<StoredFile> {
        let original_name = upload
            .original_name
            .filter(|n| !n.is_empty())
            .ok_or(FiledropError::NoFile)?;
        let content = upload.content.ok_or(FiledropError::NoFile)?;

        let ext = policy::check(&original_name, upload.content_type.as_deref())
            .map_err(FiledropError::InvalidType)?;

        let size = content.len() as u64;
        if size > self.max_file_size {
            return Err(FiledropError::TooLarge {
                size,
                limit: self.max_file_size,
            });
        }

        let id = Uuid::new_v4();
        let name = format!("{id}.{ext}");
        write_content(&self.root.join(&name), &content).await?;

        tracing::info!(file = %name, size, "Stored upload");

        let description = upload
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DESCRIPTION_NOT_PROVIDED.to_string());
        let dir = self.descriptions_dir();
        let stored_name = name.clone();
        tokio::spawn(async move {
            if let Err(e) = write_description(dir, stored_name, description).await {
                tracing::warn!(error = %e, "Description not saved");
            }
        });

        Ok(StoredFile {
            id,
            url: file_url(&self.base_url, &name),
            name,
        })
    }

    async fn list(&self) -> Result<Vec<Entry>> {
        let mut dir = fs::read_dir(&self.root)
            .await
            .map_err(FiledropError::StoreUnavailable)?;

        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(FiledropError::StoreUnavailable)?
        {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => match stored_id(&name).map(str::to_string) {
                    Some(id) => names.push((id, name)),
                    None => tracing::debug!(file = %name, "Skipping file not named by the store"),
                },
                Err(raw) => tracing::debug!("Skipping non-UTF-8 file name {:?}", raw),
            }
        }
        names.sort_by(|a, b| a.1.cmp(&b.1));

        let mut entries = Vec::with_capacity(names.len());
        for (id, name) in names {
            entries.push(Entry {
                id,
                url: file_url(&self.base_url, &name),
                description: self.read_description(&name).await,
                name,
            });
        }

        Ok(entries)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let stored_name = self.resolve(name).await?;

        match fs::remove_file(self.root.join(&stored_name)).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FiledropError::NotFound(format!("File {name}")));
            }
            Err(e) => return Err(e.into()),
        }

        let description = self.description_path(&stored_name);
        if let Err(e) = fs::remove_file(&description).await {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %description.display(), error = %e, "Failed to delete description file");
            }
        }

        tracing::info!(file = %stored_name, "Deleted file");
        Ok(())
    }
}
