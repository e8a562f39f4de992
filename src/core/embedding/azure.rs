//! Azure OpenAI embeddings client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::Embedder;
use crate::core::config::EmbeddingConfig;
use crate::core::error::{DocIndexError, Result};

/// Embeddings client for an Azure OpenAI deployment
#[derive(Debug, Clone)]
pub struct AzureOpenAiEmbedder {
    client: Client,
    url: String,
    deployment: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: [&'a str; 1],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

fn ensure(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(DocIndexError::ConfigError(message.to_string()))
    }
}

impl AzureOpenAiEmbedder {
    /// Build a client from the `[embedding]` configuration
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        ensure(
            config.endpoint.starts_with("http://") || config.endpoint.starts_with("https://"),
            "embedding endpoint must be an http(s) URL",
        )?;
        ensure(!config.api_key.trim().is_empty(), "missing embedding API key")?;
        ensure(
            !config.deployment.trim().is_empty(),
            "missing embedding deployment name",
        )?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "api-key",
            HeaderValue::from_str(config.api_key.trim())
                .map_err(|_| DocIndexError::ConfigError("invalid embedding API key".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .default_headers(headers)
            .build()
            .map_err(|e| {
                DocIndexError::ConfigError(format!("failed to build embedding HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            url: embeddings_url(&config.endpoint, &config.deployment, &config.api_version),
            deployment: config.deployment.clone(),
            dimensions: config.dimensions,
        })
    }
}

/// `{endpoint}/openai/deployments/{deployment}/embeddings?api-version=..`
fn embeddings_url(endpoint: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{}/embeddings?api-version={}",
        endpoint.trim_end_matches('/'),
        deployment,
        api_version
    )
}

#[async_trait]
impl Embedder for AzureOpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbeddingRequest { input: [text] })
            .send()
            .await
            .map_err(|e| DocIndexError::EmbeddingFailed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(DocIndexError::EmbeddingFailed(format!(
                "embeddings request failed ({status}): {body}"
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            DocIndexError::EmbeddingFailed(format!("failed to parse embedding response: {e}"))
        })?;
        first_embedding(parsed, self.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        &self.deployment
    }
}

fn first_embedding(response: EmbeddingResponse, dimensions: usize) -> Result<Vec<f32>> {
    let embedding = response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| DocIndexError::EmbeddingFailed("response carried no data".to_string()))?;

    if embedding.len() != dimensions {
        return Err(DocIndexError::EmbeddingFailed(format!(
            "expected {dimensions} dimensions, got {}",
            embedding.len()
        )));
    }
    Ok(embedding)
}
