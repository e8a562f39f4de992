//! Ingestion pipeline orchestration.
//!
//! Coordinates the end-to-end ingestion workflow:
//! 1. Resolve the input path to documents
//! 2. Extract per-page text and build the page map
//! 3. Split into overlapping segments
//! 4. Embed each segment into a section
//! 5. Upload sections in batches
//!
//! Every step is awaited in turn; the first collaborator error
//! ends the run.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use crate::core::embedding::Embedder;
use crate::core::error::Result;
use crate::core::ingest::extractor::extractor_for;
use crate::core::ingest::section::{section_id, source_page, SectionAssembler};
use crate::core::ingest::uploader::BatchUploader;
use crate::core::ingest::walker::DocumentWalker;
use crate::core::ingest::{PageMap, TextSplitter};
use crate::core::storage::SearchIndex;
use crate::core::types::IngestStats;

/// A section as it would be uploaded, without its embedding
#[derive(Debug, Clone, Serialize)]
pub struct SectionPreview {
    pub id: String,
    pub sourcepage: String,
    pub start: usize,
    pub end: usize,
    pub content: String,
}

/// Extract the pages of one document into a page map
pub fn load_page_map(path: &Path) -> Result<PageMap> {
    let pages = extractor_for(path)?.extract_pages(path)?;
    Ok(PageMap::build(pages))
}

/// Split a document without embedding or uploading
pub fn preview_file(splitter: &TextSplitter, path: &Path) -> Result<Vec<SectionPreview>> {
    let filename = path.to_string_lossy();
    let page_map = load_page_map(path)?;
    let assembler = SectionAssembler::new(filename.as_ref());

    Ok(splitter
        .split(&page_map)
        .enumerate()
        .map(|(index, segment)| SectionPreview {
            id: section_id(assembler.file_id(), index),
            sourcepage: source_page(assembler.filename(), segment.page),
            start: segment.start,
            end: segment.end,
            content: segment.text,
        })
        .collect())
}

/// Orchestrates ingestion against an embedder and an index
pub struct IngestPipeline<'a> {
    splitter: TextSplitter,
    walker: DocumentWalker,
    embedder: &'a dyn Embedder,
    index: &'a dyn SearchIndex,
    batch_size: usize,
}

impl<'a> IngestPipeline<'a> {
    pub fn new(
        splitter: TextSplitter,
        walker: DocumentWalker,
        embedder: &'a dyn Embedder,
        index: &'a dyn SearchIndex,
        batch_size: usize,
    ) -> Self {
        Self {
            splitter,
            walker,
            embedder,
            index,
            batch_size,
        }
    }

    /// Ingest a file or every matching document under a directory.
    ///
    /// Documents are processed in path order and share one
    /// uploader, so batches may span files.
    pub async fn ingest_path(&self, path: &Path) -> Result<IngestStats> {
        let started_at = Utc::now();
        let start = Instant::now();

        let files = self.walker.resolve(path)?;
        tracing::info!("Found {} documents under {:?}", files.len(), path);

        let mut uploader = BatchUploader::new(self.index, self.batch_size);
        let mut pages_extracted = 0;
        let mut sections_created = 0;

        for (idx, file) in files.iter().enumerate() {
            tracing::info!("Processing {:?} ({}/{})", file, idx + 1, files.len());
            let (pages, sections) = self.ingest_file(file, &mut uploader).await?;
            pages_extracted += pages;
            sections_created += sections;
        }

        let upload = uploader.finish().await?;
        let stats = IngestStats {
            files_ingested: files.len(),
            pages_extracted,
            sections_created,
            upload,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "Ingested {} files: {} sections, {} uploaded, {} rejected in {}ms",
            stats.files_ingested,
            stats.sections_created,
            stats.upload.succeeded(),
            stats.upload.failed(),
            stats.duration_ms
        );
        Ok(stats)
    }

    /// Push the sections of one document; returns (pages, sections)
    async fn ingest_file(
        &self,
        path: &Path,
        uploader: &mut BatchUploader<'_>,
    ) -> Result<(usize, usize)> {
        let page_map = load_page_map(path)?;
        let assembler = SectionAssembler::new(path.to_string_lossy());

        let mut sections = 0;
        for (index, segment) in self.splitter.split(&page_map).enumerate() {
            let section = assembler.assemble(segment, index, self.embedder).await?;
            uploader.push(section).await?;
            sections += 1;
        }

        tracing::debug!(
            "{:?}: {} pages, {} chars, {} sections",
            path,
            page_map.len(),
            page_map.total_chars(),
            sections
        );
        Ok((page_map.len(), sections))
    }
}
