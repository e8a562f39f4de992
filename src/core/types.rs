//! Core data types for docindex.
//!
//! This module defines the data structures passed between the
//! ingestion stages and the external collaborators: pages,
//! sections, upload results, and search hits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of extracted text with its position in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    /// Zero-based page number
    pub page_number: usize,

    /// Characters in all preceding pages
    pub char_offset: usize,

    /// Extracted page text
    pub text: String,
}

/// A section of a document, ready for upload
///
/// Field names match the index schema, so the struct serializes
/// directly into an upload payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Deterministic key: `<file id>-page-<sequence>`
    pub id: String,

    /// Section text
    pub content: String,

    /// Embedding of the whitespace-normalized content
    pub embedding: Vec<f32>,

    /// Human-readable origin label, e.g. `report-3.pdf`
    pub sourcepage: String,

    /// Original path of the ingested file
    pub sourcefile: String,
}

/// Outcome of uploading a single document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingResult {
    /// Document key
    pub key: String,

    /// Whether the index accepted the document
    pub succeeded: bool,

    /// Failure reason reported by the index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl IndexingResult {
    pub fn success(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            succeeded: true,
            error_message: None,
        }
    }

    pub fn failure(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            succeeded: false,
            error_message: Some(message.into()),
        }
    }
}

/// Per-batch upload report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Zero-based batch number within the run
    pub batch: usize,

    /// Sections sent in this batch
    pub submitted: usize,

    /// Sections the index acknowledged as stored
    pub succeeded: usize,

    /// Rejected documents and their reasons
    pub failures: Vec<IndexingResult>,
}

impl BatchReport {
    /// Number of rejected documents
    pub fn failed(&self) -> usize {
        self.submitted - self.succeeded
    }
}

/// Accumulated upload results of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadSummary {
    pub batches: Vec<BatchReport>,
}

impl UploadSummary {
    /// Total sections submitted across all batches
    pub fn submitted(&self) -> usize {
        self.batches.iter().map(|b| b.submitted).sum()
    }

    /// Total sections acknowledged across all batches
    pub fn succeeded(&self) -> usize {
        self.batches.iter().map(|b| b.succeeded).sum()
    }

    /// Total rejected sections
    pub fn failed(&self) -> usize {
        self.submitted() - self.succeeded()
    }
}

/// Statistics from an ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestStats {
    /// Number of files processed
    pub files_ingested: usize,

    /// Pages extracted across all files
    pub pages_extracted: usize,

    /// Sections produced by the splitter
    pub sections_created: usize,

    /// Upload outcome per batch
    pub upload: UploadSummary,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Run duration in milliseconds
    pub duration_ms: u64,
}

/// Combined keyword + vector query
#[derive(Debug, Clone)]
pub struct HybridQuery {
    /// Full-text query string
    pub text: String,

    /// Embedding of `text`
    pub vector: Vec<f32>,

    /// Number of documents to return
    pub top: usize,

    /// Nearest neighbours considered by the vector leg
    pub k: usize,

    /// Vector field to search
    pub vector_field: String,
}

/// A document returned by hybrid search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Relevance score (scale depends on the backend)
    #[serde(rename = "@search.score", default)]
    pub score: f64,

    pub id: String,

    pub content: String,

    pub sourcepage: String,

    pub sourcefile: String,
}

impl SearchHit {
    /// `sourcepage: content` with line breaks flattened to spaces
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.sourcepage, single_line(&self.content))
    }
}

/// Replace newlines and carriage returns with spaces
pub fn single_line(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}
