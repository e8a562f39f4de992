//! Input file discovery.
//!
//! Resolves an ingest path to the ordered list of documents to
//! process. A file path is taken as-is; a directory is walked and
//! filtered with glob patterns. Unreadable entries are logged and
//! skipped.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::config::IngestConfig;
use crate::core::error::{DocIndexError, Result};

/// Directory walker with pattern and size filtering
pub struct DocumentWalker {
    /// Patterns a file must match (e.g. "*.pdf")
    include_patterns: Vec<Pattern>,

    /// Patterns that exclude files or whole directories
    exclude_patterns: Vec<Pattern>,

    /// Files above this size are skipped
    max_file_size_bytes: u64,
}

fn compile(patterns: &[String], kind: &str) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                DocIndexError::ConfigError(format!("Invalid {kind} pattern '{p}': {e}"))
            })
        })
        .collect()
}

impl DocumentWalker {
    /// Create a walker; fails on malformed glob patterns
    pub fn new(
        include_patterns: &[String],
        exclude_patterns: &[String],
        max_file_size_mb: usize,
    ) -> Result<Self> {
        Ok(Self {
            include_patterns: compile(include_patterns, "include")?,
            exclude_patterns: compile(exclude_patterns, "exclude")?,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    pub fn from_config(config: &IngestConfig) -> Result<Self> {
        Self::new(
            &config.include_patterns,
            &config.exclude_patterns,
            config.max_file_size_mb,
        )
    }

    /// Resolve `path` to the documents to ingest, sorted by path.
    ///
    /// A regular file is returned alone, without pattern checks.
    /// A missing path is an [`DocIndexError::InvalidPath`].
    pub fn resolve(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(DocIndexError::InvalidPath(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }

        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }

        let mut files = self.collect_files(path);
        files.sort();
        Ok(files)
    }

    fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_descend(e, root))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if let Ok(metadata) = entry.metadata() {
                if metadata.len() > self.max_file_size_bytes {
                    tracing::debug!(
                        "Skipping large file: {:?} ({} bytes)",
                        path,
                        metadata.len()
                    );
                    continue;
                }
            }

            if self.matches_patterns(path) {
                files.push(path.to_path_buf());
            }
        }

        files
    }

    /// Skip hidden and excluded directories; never the root
    fn should_descend(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();
        if path == root || !entry.file_type().is_dir() {
            return true;
        }

        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            return false;
        }

        if self.exclude_patterns.iter().any(|p| p.matches_path(path)) {
            tracing::debug!("Skipping excluded directory: {:?}", path);
            return false;
        }

        true
    }

    fn matches_patterns(&self, path: &Path) -> bool {
        let Some(path_str) = path.to_str() else {
            return false;
        };
        let file_name = path.file_name().and_then(|f| f.to_str());

        let included = self.include_patterns.is_empty()
            || self
                .include_patterns
                .iter()
                .any(|p| p.matches(path_str) || file_name.is_some_and(|f| p.matches(f)));

        included
            && !self
                .exclude_patterns
                .iter()
                .any(|p| p.matches(path_str) || p.matches_path(path))
    }
}
