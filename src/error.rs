//! Error types for Resift
//!
//! Storage, configuration and terminal failures all funnel into [`ResiftError`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Resift operations
#[derive(Error, Debug)]
pub enum ResiftError {
    #[error("Failed to read storage key '{key}': {source}")]
    StorageRead {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write storage key '{key}': {source}")]
    StorageWrite {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage file '{0}' is corrupt: {1}")]
    CorruptStorage(PathBuf, String),

    #[error("Container '{0}' not found on the page")]
    ContainerNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Failed to load catalog '{0}': {1}")]
    CatalogLoad(PathBuf, String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for Resift operations
pub type Result<T> = std::result::Result<T, ResiftError>;

impl ResiftError {
    /// Check if this error leaves the store usable (the next operation may succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ResiftError::StorageRead { .. } | ResiftError::StorageWrite { .. }
        )
    }
}
