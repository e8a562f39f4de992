//! Query embedding and hybrid query dispatch.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::core::embedding::Embedder;
use crate::core::error::{DocIndexError, Result};
use crate::core::storage::SearchIndex;
use crate::core::types::{HybridQuery, SearchHit};

/// Vector field searched by hybrid queries
pub const VECTOR_FIELD: &str = "embedding";

/// Results of one search
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub count: usize,
    pub duration_ms: u64,
}

/// Hybrid search service
pub struct SearchService {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn SearchIndex>,
    default_top: usize,
    default_top_k: usize,
}

impl SearchService {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn SearchIndex>,
        default_top: usize,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            default_top,
            default_top_k,
        }
    }

    /// Search for `query`, returning at most `top` hits.
    ///
    /// `top_k` is the number of nearest neighbours the vector leg
    /// considers. Unset limits fall back to the configured defaults;
    /// `top_k` is never below `top`.
    pub async fn search(
        &self,
        query: &str,
        top: Option<usize>,
        top_k: Option<usize>,
    ) -> Result<SearchResponse> {
        let start = Instant::now();

        let text = query.trim();
        if text.is_empty() {
            return Err(DocIndexError::InvalidQuery(
                "Query cannot be empty".to_string(),
            ));
        }

        let top = top.unwrap_or(self.default_top);
        if top == 0 {
            return Err(DocIndexError::InvalidQuery(
                "top must be at least 1".to_string(),
            ));
        }
        let k = top_k.unwrap_or(self.default_top_k).max(top);

        let vector = self.embedder.embed(text).await?;
        let hybrid = HybridQuery {
            text: text.to_string(),
            vector,
            top,
            k,
            vector_field: VECTOR_FIELD.to_string(),
        };

        let results = self.index.search(&hybrid).await?;
        let count = results.len();
        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Search {:?} on '{}': {} hits in {}ms",
            text,
            self.index.name(),
            count,
            duration_ms
        );

        Ok(SearchResponse {
            query: text.to_string(),
            results,
            count,
            duration_ms,
        })
    }
}
