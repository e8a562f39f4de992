//! Unified service container for docindex
//!
//! Builds the external collaborators once from configuration and
//! hands them to the ingestion pipeline and the search service.

use std::sync::Arc;

use crate::core::config::{Config, EmbeddingConfig, IndexBackend, IndexConfig, SplittingConfig};
use crate::core::embedding::{AzureOpenAiEmbedder, Embedder};
use crate::core::error::Result;
use crate::core::ingest::{DocumentWalker, IngestPipeline, TextSplitter};
use crate::core::search::SearchService;
use crate::core::storage::{AzureSearchIndex, IndexDefinition, SearchIndex, TantivyIndex};

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Embedding service for sections and queries
    pub embedder: Arc<dyn Embedder>,

    /// Target search index
    pub index: Arc<dyn SearchIndex>,

    /// Hybrid search over `index`
    pub search: Arc<SearchService>,

    /// Application configuration
    pub config: Arc<Config>,
}

/// Build the embedding client described by `[embedding]`
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    Ok(Arc::new(AzureOpenAiEmbedder::new(config)?))
}

/// Build the index backend selected by `[index].backend`
pub fn build_index(config: &IndexConfig) -> Result<Arc<dyn SearchIndex>> {
    Ok(match config.backend {
        IndexBackend::Azure => Arc::new(AzureSearchIndex::new(config)?),
        IndexBackend::Local => Arc::new(TantivyIndex::new(&config.local_dir, &config.index_name)),
    })
}

/// Definition of the section index for this configuration
pub fn index_definition(config: &Config) -> IndexDefinition {
    IndexDefinition::for_sections(
        &config.index.index_name,
        config.embedding.dimensions,
        &config.index.vector_profile,
        &config.index.vector_algorithm,
    )
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Result<Self> {
        let embedder = build_embedder(&config.embedding)?;
        let index = build_index(&config.index)?;
        Ok(Self::with_collaborators(config, embedder, index))
    }

    /// Create services around already-built collaborators
    pub fn with_collaborators(
        config: Config,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn SearchIndex>,
    ) -> Self {
        let search = Arc::new(SearchService::new(
            Arc::clone(&embedder),
            Arc::clone(&index),
            config.search.top,
            config.search.top_k,
        ));

        Self {
            embedder,
            index,
            search,
            config: Arc::new(config),
        }
    }

    /// Create an IngestPipeline from the configured splitting,
    /// ingest and batch settings
    pub fn create_pipeline(&self) -> Result<IngestPipeline<'_>> {
        self.create_pipeline_with(&self.config.splitting, self.config.index.batch_size)
    }

    /// Create an IngestPipeline with per-run splitting and batch
    /// settings
    ///
    /// Settings are expected to be validated (`Config::validate`).
    pub fn create_pipeline_with(
        &self,
        splitting: &SplittingConfig,
        batch_size: usize,
    ) -> Result<IngestPipeline<'_>> {
        let walker = DocumentWalker::from_config(&self.config.ingest)?;
        Ok(IngestPipeline::new(
            TextSplitter::from_config(splitting),
            walker,
            self.embedder.as_ref(),
            self.index.as_ref(),
            batch_size,
        ))
    }
}
