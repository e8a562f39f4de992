//! Embedding service boundary.
//!
//! The pipeline asks for one vector per section and one per query.
//! [`Embedder`] is the seam; [`AzureOpenAiEmbedder`] is the
//! production client.

mod azure;

pub use azure::AzureOpenAiEmbedder;

use async_trait::async_trait;

use crate::core::error::Result;

/// Computes fixed-size embedding vectors for text
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one text; the vector has [`Embedder::dimensions`] entries
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Vector length produced by [`Embedder::embed`]
    fn dimensions(&self) -> usize;

    /// Model or deployment name, for logging
    fn model(&self) -> &str;
}
