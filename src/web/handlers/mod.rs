//! HTTP handlers.

pub mod files;
pub mod pages;

pub use files::{delete_file, list_files, upload_file};
pub use pages::{files_page, upload_page};

use std::sync::Arc;

use crate::config::{AuthConfig, Config};
use crate::store::FileStore;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backing file store.
    pub store: Arc<dyn FileStore>,
    /// Admin credentials.
    pub auth: AuthConfig,
    /// Upload ceiling in bytes.
    pub max_file_size: u64,
}

impl AppState {
    /// Create application state from a store and the startup configuration.
    pub fn new(store: Arc<dyn FileStore>, config: &Config) -> Self {
        Self {
            store,
            auth: config.auth.clone(),
            max_file_size: config.storage.max_file_size,
        }
    }
}
