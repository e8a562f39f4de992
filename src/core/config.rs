//! Configuration management for docindex.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! Service credentials (endpoints and API keys) have no defaults;
//! they are checked when the corresponding client is built.

use crate::core::error::{DocIndexError, Result};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub splitting: SplittingConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Section splitting configuration (all lengths in characters)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SplittingConfig {
    /// Target section length before boundary search
    #[serde(default = "default_max_section_length")]
    pub max_section_length: usize,

    /// How far to look past the target length for a sentence end
    #[serde(default = "default_sentence_search_limit")]
    pub sentence_search_limit: usize,

    /// Characters repeated between consecutive sections
    #[serde(default = "default_section_overlap")]
    pub section_overlap: usize,
}

/// Embedding service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// Service base URL, e.g. `https://my-resource.openai.azure.com`
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_embedding_api_version")]
    pub api_version: String,

    /// Deployment (model) name
    #[serde(default = "default_deployment")]
    pub deployment: String,

    /// Vector length produced by the deployment
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    #[serde(default = "default_timeout")]
    pub timeout_sec: u64,
}

/// Which index collaborator to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    /// Hosted search service over REST
    #[default]
    Azure,
    /// Tantivy index on local disk
    Local,
}

impl FromStr for IndexBackend {
    type Err = DocIndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "azure" => Ok(Self::Azure),
            "local" => Ok(Self::Local),
            other => Err(DocIndexError::ConfigError(format!(
                "Unknown index backend '{other}' (expected 'azure' or 'local')"
            ))),
        }
    }
}

impl fmt::Display for IndexBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Azure => write!(f, "azure"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Index service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub backend: IndexBackend,

    /// Search service base URL, e.g. `https://my-search.search.windows.net`
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_index_name")]
    pub index_name: String,

    #[serde(default = "default_index_api_version")]
    pub api_version: String,

    /// Sections per upload request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_vector_profile")]
    pub vector_profile: String,

    #[serde(default = "default_vector_algorithm")]
    pub vector_algorithm: String,

    /// Root directory for the local backend
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,

    #[serde(default = "default_timeout")]
    pub timeout_sec: u64,
}

/// Query configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Number of documents returned
    #[serde(default = "default_top")]
    pub top: usize,

    /// Nearest neighbours considered by the vector leg
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Input discovery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Maximum file size in MB (skip larger files when walking directories)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,
}

// Default value functions
fn default_max_section_length() -> usize {
    1000
}

fn default_sentence_search_limit() -> usize {
    100
}

fn default_section_overlap() -> usize {
    100
}

fn default_embedding_api_version() -> String {
    "2023-05-15".to_string()
}

fn default_deployment() -> String {
    "textembedding".to_string()
}

fn default_dimensions() -> usize {
    1536
}

fn default_timeout() -> u64 {
    60
}

fn default_index_name() -> String {
    "documents".to_string()
}

fn default_index_api_version() -> String {
    "2023-11-01".to_string()
}

fn default_batch_size() -> usize {
    1000
}

fn default_vector_profile() -> String {
    "my-vector-config".to_string()
}

fn default_vector_algorithm() -> String {
    "my-hnsw".to_string()
}

fn default_local_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_top() -> usize {
    3
}

fn default_top_k() -> usize {
    50
}

fn default_include_patterns() -> Vec<String> {
    vec![
        "*.pdf".to_string(),
        "*.txt".to_string(),
        "*.md".to_string(),
    ]
}

fn default_max_file_size() -> usize {
    100
}

impl Default for SplittingConfig {
    fn default() -> Self {
        Self {
            max_section_length: default_max_section_length(),
            sentence_search_limit: default_sentence_search_limit(),
            section_overlap: default_section_overlap(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            api_version: default_embedding_api_version(),
            deployment: default_deployment(),
            dimensions: default_dimensions(),
            timeout_sec: default_timeout(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: IndexBackend::default(),
            endpoint: String::new(),
            api_key: String::new(),
            index_name: default_index_name(),
            api_version: default_index_api_version(),
            batch_size: default_batch_size(),
            vector_profile: default_vector_profile(),
            vector_algorithm: default_vector_algorithm(),
            local_dir: default_local_dir(),
            timeout_sec: default_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            top_k: default_top_k(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            include_patterns: default_include_patterns(),
            exclude_patterns: Vec::new(),
            max_file_size_mb: default_max_file_size(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DocIndexError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// File priority:
    /// 1. DOCINDEX_CONFIG env var (resolved by `XdgDirs::config_file`)
    /// 2. XDG config file (~/.config/docindex/config.toml)
    /// 3. ./docindex.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let config_file = xdg.config_file();
        let mut config = if config_file.exists() {
            Self::from_file(config_file)?
        } else if env::var("DOCINDEX_CONFIG").is_ok() {
            return Err(DocIndexError::ConfigError(format!(
                "Config file {config_file:?} does not exist"
            )));
        } else if Path::new("docindex.toml").exists() {
            Self::from_file("docindex.toml")?
        } else {
            Self::default()
        };

        // Local indexes live under the XDG data dir unless placed explicitly
        if env::var("DOCINDEX_DATA_DIR").is_err() && config.index.local_dir == default_local_dir()
        {
            config.index.local_dir = xdg.indexes_dir();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    ///
    /// Unparseable numeric values are ignored and the previous value kept.
    pub fn merge_env(&mut self) {
        // Splitting
        if let Some(v) = env_parse("DOCINDEX_MAX_SECTION_LENGTH") {
            self.splitting.max_section_length = v;
        }
        if let Some(v) = env_parse("DOCINDEX_SENTENCE_SEARCH_LIMIT") {
            self.splitting.sentence_search_limit = v;
        }
        if let Some(v) = env_parse("DOCINDEX_SECTION_OVERLAP") {
            self.splitting.section_overlap = v;
        }

        // Embedding service
        if let Ok(endpoint) = env::var("DOCINDEX_EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = endpoint;
        }
        if let Ok(key) = env::var("DOCINDEX_EMBEDDING_API_KEY") {
            self.embedding.api_key = key;
        }
        if let Ok(version) = env::var("DOCINDEX_EMBEDDING_API_VERSION") {
            self.embedding.api_version = version;
        }
        if let Ok(deployment) = env::var("DOCINDEX_EMBEDDING_DEPLOYMENT") {
            self.embedding.deployment = deployment;
        }
        if let Some(v) = env_parse("DOCINDEX_EMBEDDING_DIMENSIONS") {
            self.embedding.dimensions = v;
        }

        // Index service
        if let Some(backend) = env_parse("DOCINDEX_INDEX_BACKEND") {
            self.index.backend = backend;
        }
        if let Ok(endpoint) = env::var("DOCINDEX_SEARCH_ENDPOINT") {
            self.index.endpoint = endpoint;
        }
        if let Ok(key) = env::var("DOCINDEX_SEARCH_API_KEY") {
            self.index.api_key = key;
        }
        if let Ok(name) = env::var("DOCINDEX_INDEX_NAME") {
            self.index.index_name = name;
        }
        if let Some(v) = env_parse("DOCINDEX_BATCH_SIZE") {
            self.index.batch_size = v;
        }
        if let Ok(data_dir) = env::var("DOCINDEX_DATA_DIR") {
            self.index.local_dir = PathBuf::from(data_dir).join("indexes");
        }

        // Query
        if let Some(v) = env_parse("DOCINDEX_SEARCH_TOP") {
            self.search.top = v;
        }
        if let Some(v) = env_parse("DOCINDEX_SEARCH_TOP_K") {
            self.search.top_k = v;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let splitting = &self.splitting;
        if splitting.max_section_length == 0 {
            return Err(DocIndexError::ConfigError(
                "Max section length must be non-zero".to_string(),
            ));
        }

        if splitting.section_overlap >= splitting.max_section_length {
            return Err(DocIndexError::ConfigError(
                "Section overlap must be less than max section length".to_string(),
            ));
        }

        if self.embedding.dimensions == 0 {
            return Err(DocIndexError::ConfigError(
                "Embedding dimensions must be non-zero".to_string(),
            ));
        }

        if self.index.batch_size == 0 {
            return Err(DocIndexError::ConfigError(
                "Batch size must be non-zero".to_string(),
            ));
        }

        if self.index.index_name.trim().is_empty() {
            return Err(DocIndexError::ConfigError(
                "Index name cannot be empty".to_string(),
            ));
        }

        if self.search.top == 0 {
            return Err(DocIndexError::ConfigError(
                "Search top must be non-zero".to_string(),
            ));
        }

        if self.search.top > self.search.top_k {
            return Err(DocIndexError::ConfigError(
                "Search top cannot exceed top_k".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!(
            "  Splitting: max {} / search limit {} / overlap {} chars",
            self.splitting.max_section_length,
            self.splitting.sentence_search_limit,
            self.splitting.section_overlap
        );
        tracing::info!(
            "  Embedding: {} (deployment {}, {} dims, key {})",
            display_or_unset(&self.embedding.endpoint),
            self.embedding.deployment,
            self.embedding.dimensions,
            redact(&self.embedding.api_key)
        );
        tracing::info!(
            "  Index: {} backend, name {}, batch size {}",
            self.index.backend,
            self.index.index_name,
            self.index.batch_size
        );
        match self.index.backend {
            IndexBackend::Azure => tracing::info!(
                "  Search service: {} (key {})",
                display_or_unset(&self.index.endpoint),
                redact(&self.index.api_key)
            ),
            IndexBackend::Local => tracing::info!("  Local dir: {:?}", self.index.local_dir),
        }
        tracing::info!("  Query: top {} of k {}", self.search.top, self.search.top_k);
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "<unset>"
    } else {
        value
    }
}

/// Mask a secret for display
pub fn redact(secret: &str) -> String {
    if secret.is_empty() {
        "<unset>".to_string()
    } else {
        "****".to_string()
    }
}
