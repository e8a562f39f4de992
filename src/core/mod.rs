//! Core domain logic
//!
//! Everything except the command-line surface lives here.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **ingest**: Extraction, segmentation, section assembly, upload
//! - **embedding**: Embedding service boundary and Azure OpenAI client
//! - **storage**: Index definition, Azure AI Search and local tantivy backends
//! - **search**: Hybrid query service
//! - **services**: Unified service container

pub mod config;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod search;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{DocIndexError, Result};
pub use services::Services;
