//! docindex - document ingestion for hybrid search
//!
//! Extracts per-page text from documents, splits it into
//! overlapping sections that prefer sentence and word boundaries,
//! embeds each section and uploads the sections to a search index
//! that serves combined keyword and vector queries.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - ingest (page map, splitter, sections, batched upload)
//!   - embedding (Azure OpenAI)
//!   - storage (Azure AI Search, local tantivy)
//!   - search (hybrid queries)
//!   - services (unified service container)
//!
//! - **cli**: the `docindex` command-line adapter
//!
//! # Key Features
//!
//! - Char-indexed segmentation (never splits a UTF-8 sequence)
//! - Sections never open inside an unterminated `<table>`
//! - Every section maps back to the page it starts on
//! - Deterministic, reversible document keys

pub mod cli;
pub mod core;

pub use core::config::Config;
pub use core::error::{DocIndexError, Result};
pub use core::services::Services;
pub use core::types::*;
