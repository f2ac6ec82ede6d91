//! Error types for filedrop.

use thiserror::Error;

/// Common error type for filedrop.
#[derive(Error, Debug)]
pub enum FiledropError {
    /// The declared file type is not on the allow-list.
    #[error("invalid file type: {0}")]
    InvalidType(String),

    /// The upload exceeds the configured size ceiling.
    #[error("file too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    /// The request carried no uploadable content.
    #[error("no file selected")]
    NoFile,

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// The content directory could not be enumerated.
    #[error("file store unavailable: {0}")]
    StoreUnavailable(#[source] std::io::Error),

    /// Writing a description file failed.
    ///
    /// Only ever logged; never returned to a caller of the store.
    #[error("failed to write description for {name}: {source}")]
    DescriptionWriteFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for filedrop operations.
pub type Result<T> = std::result::Result<T, FiledropError>;
