//! Azure AI Search REST backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::{CreateMode, IndexDefinition, SearchIndex};
use crate::core::config::IndexConfig;
use crate::core::error::{DocIndexError, Result};
use crate::core::types::{HybridQuery, IndexingResult, SearchHit, Section};

/// Fields returned by search requests
const SELECT_FIELDS: &str = "id,content,sourcepage,sourcefile";

/// Client for one Azure AI Search index
#[derive(Debug, Clone)]
pub struct AzureSearchIndex {
    client: Client,
    endpoint: String,
    index_name: String,
    api_version: String,
}

#[derive(Serialize)]
struct UploadAction<'a> {
    #[serde(rename = "@search.action")]
    action: &'static str,
    #[serde(flatten)]
    section: &'a Section,
}

#[derive(Serialize)]
struct UploadBatch<'a> {
    value: Vec<UploadAction<'a>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemResult {
    key: String,
    status: bool,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    status_code: u16,
}

#[derive(Deserialize)]
struct UploadResponse {
    value: Vec<ItemResult>,
}

#[derive(Serialize)]
struct VectorQuery<'a> {
    kind: &'static str,
    vector: &'a [f32],
    k: usize,
    fields: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    search: &'a str,
    top: usize,
    select: &'static str,
    vector_queries: [VectorQuery<'a>; 1],
}

#[derive(Deserialize)]
struct SearchResponse {
    value: Vec<SearchHit>,
}

impl AzureSearchIndex {
    /// Build a client from the `[index]` configuration
    pub fn new(config: &IndexConfig) -> Result<Self> {
        if !(config.endpoint.starts_with("http://") || config.endpoint.starts_with("https://")) {
            return Err(DocIndexError::ConfigError(
                "search endpoint must be an http(s) URL".to_string(),
            ));
        }
        if config.api_key.trim().is_empty() {
            return Err(DocIndexError::ConfigError(
                "missing search API key".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "api-key",
            HeaderValue::from_str(config.api_key.trim())
                .map_err(|_| DocIndexError::ConfigError("invalid search API key".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .default_headers(headers)
            .build()
            .map_err(|e| {
                DocIndexError::ConfigError(format!("failed to build search HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            index_name: config.index_name.clone(),
            api_version: config.api_version.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}?api-version={}",
            self.endpoint, path, self.api_version
        )
    }

    fn docs_url(&self, operation: &str) -> String {
        self.url(&format!("/indexes/{}/docs/{operation}", self.index_name))
    }
}

async fn error_body(response: Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string())
}

impl From<ItemResult> for IndexingResult {
    fn from(item: ItemResult) -> Self {
        if item.status {
            IndexingResult::success(item.key)
        } else {
            let message = item
                .error_message
                .unwrap_or_else(|| format!("rejected with status {}", item.status_code));
            IndexingResult::failure(item.key, message)
        }
    }
}

#[async_trait]
impl SearchIndex for AzureSearchIndex {
    fn name(&self) -> &str {
        &self.index_name
    }

    async fn create_index(&self, definition: &IndexDefinition, mode: CreateMode) -> Result<()> {
        definition.validate()?;

        let request = match mode {
            CreateMode::Create => self.client.post(self.url("/indexes")),
            CreateMode::CreateOrUpdate => self
                .client
                .put(self.url(&format!("/indexes/{}", definition.name))),
        };
        let response = request.json(definition).send().await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(DocIndexError::IndexAlreadyExists(definition.name.clone()));
        }
        if !status.is_success() {
            return Err(DocIndexError::IndexingFailed(format!(
                "index provisioning failed ({status}): {}",
                error_body(response).await
            )));
        }

        tracing::info!("Index '{}' provisioned ({:?})", definition.name, mode);
        Ok(())
    }

    async fn upload_documents(&self, sections: &[Section]) -> Result<Vec<IndexingResult>> {
        if sections.is_empty() {
            return Ok(Vec::new());
        }

        let batch = UploadBatch {
            value: sections
                .iter()
                .map(|section| UploadAction {
                    action: "upload",
                    section,
                })
                .collect(),
        };
        let response = self
            .client
            .post(self.docs_url("index"))
            .json(&batch)
            .send()
            .await?;

        // 207 carries per-item results just like 200
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DocIndexError::IndexNotFound(self.index_name.clone()));
        }
        if !status.is_success() {
            return Err(DocIndexError::IndexingFailed(format!(
                "upload failed ({status}): {}",
                error_body(response).await
            )));
        }

        let parsed: UploadResponse = response.json().await?;
        Ok(parsed.value.into_iter().map(IndexingResult::from).collect())
    }

    async fn search(&self, query: &HybridQuery) -> Result<Vec<SearchHit>> {
        let request = SearchRequest {
            search: &query.text,
            top: query.top,
            select: SELECT_FIELDS,
            vector_queries: [VectorQuery {
                kind: "vector",
                vector: &query.vector,
                k: query.k,
                fields: &query.vector_field,
            }],
        };
        let response = self
            .client
            .post(self.docs_url("search"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DocIndexError::IndexNotFound(self.index_name.clone()));
        }
        if !status.is_success() {
            return Err(DocIndexError::SearchFailed(format!(
                "search failed ({status}): {}",
                error_body(response).await
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed.value)
    }
}
