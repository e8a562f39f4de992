//! Error types and error handling for docindex.
//!
//! This module defines the error type used throughout the
//! ingestion pipeline. Collaborator failures (extraction,
//! embedding, index service) each get their own variant so the
//! CLI can report which stage aborted a run.

use thiserror::Error;

/// Result type alias for docindex operations
pub type Result<T> = std::result::Result<T, DocIndexError>;

/// Main error type for docindex
#[derive(Error, Debug)]
pub enum DocIndexError {
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Index already exists: {0}")]
    IndexAlreadyExists(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl DocIndexError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DocIndexError::IndexNotFound(_) | DocIndexError::InvalidPath(_)
        )
    }

    /// Check if this is a conflict error (already exists)
    pub fn is_conflict(&self) -> bool {
        matches!(self, DocIndexError::IndexAlreadyExists(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            DocIndexError::InvalidQuery(_) | DocIndexError::ConfigError(_)
        )
    }
}
