//! filedrop - minimal authenticated file hosting.
//!
//! Uploaded files are stored under generated identifiers next to an
//! optional text description, and can be listed or deleted over a small
//! JSON API protected by shared Basic credentials.

pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{FiledropError, Result};
pub use store::{Entry, FileStore, LocalFileStore, StoredFile, Upload};
pub use web::WebServer;
