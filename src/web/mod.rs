//! HTTP surface for filedrop.
//!
//! Thin axum glue over [`crate::store::FileStore`]: upload and listing
//! pages, the JSON API, Basic authentication and static serving of stored
//! files.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
