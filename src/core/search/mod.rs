//! Hybrid search over ingested sections.
//!
//! The query text is embedded with the same service used at
//! ingestion time and sent to the index together with the raw text,
//! so the backend can combine keyword and vector relevance.

mod hybrid;

pub use hybrid::{SearchResponse, SearchService, VECTOR_FIELD};
