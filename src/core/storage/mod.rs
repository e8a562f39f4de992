//! Search index backends.
//!
//! [`SearchIndex`] is the boundary the ingestion pipeline and the
//! search service talk to. Two backends implement it:
//!
//! - **AzureSearchIndex**: Azure AI Search over its REST API
//! - **TantivyIndex**: an on-disk tantivy index for offline use;
//!   keyword-only BM25, embeddings are validated but not stored
//!
//! # Local Storage Structure
//!
//! ```text
//! {local_dir}/
//! ├── {index-name}/
//! │   ├── definition.json     # IndexDefinition
//! │   └── tantivy/            # Tantivy index
//! ```

mod azure;
mod schema;
mod tantivy;

pub use azure::AzureSearchIndex;
pub use schema::{
    FieldDefinition, IndexDefinition, VectorAlgorithm, VectorProfile, VectorSearch,
    CONTENT_ANALYZER, EDM_SINGLE_COLLECTION, EDM_STRING,
};
pub use tantivy::TantivyIndex;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::types::{HybridQuery, IndexingResult, SearchHit, Section};

/// How `create_index` treats an existing index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// Fail with `IndexAlreadyExists` if the index exists
    Create,
    /// Replace the definition of an existing index
    CreateOrUpdate,
}

/// A searchable index of sections
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Index name
    fn name(&self) -> &str;

    /// Provision the index described by `definition`
    async fn create_index(&self, definition: &IndexDefinition, mode: CreateMode) -> Result<()>;

    /// Upload (insert or replace by key) a batch of sections.
    ///
    /// Returns one result per section, in input order. Rejected
    /// documents are reported in the results; only a failure of the
    /// call as a whole is an `Err`.
    async fn upload_documents(&self, sections: &[Section]) -> Result<Vec<IndexingResult>>;

    /// Hybrid keyword + vector search, best hit first.
    /// Backends without a vector index rank by keyword alone.
    async fn search(&self, query: &HybridQuery) -> Result<Vec<SearchHit>>;
}
