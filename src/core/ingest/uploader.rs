//! Batched section upload.
//!
//! Sections are buffered and sent to the index in fixed-size
//! batches. Documents the index rejects are logged and counted but
//! never retried; a failure of the upload call itself aborts the
//! run.

use std::collections::HashSet;
use std::mem;

use crate::core::error::Result;
use crate::core::storage::SearchIndex;
use crate::core::types::{BatchReport, IndexingResult, Section, UploadSummary};

/// Default number of sections per upload call
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Accumulates sections and uploads them in batches
pub struct BatchUploader<'a> {
    index: &'a dyn SearchIndex,
    batch_size: usize,
    pending: Vec<Section>,
    summary: UploadSummary,
}

impl<'a> BatchUploader<'a> {
    /// # Panics
    ///
    /// Panics if `batch_size` is 0
    pub fn new(index: &'a dyn SearchIndex, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be > 0");
        Self {
            index,
            batch_size,
            pending: Vec::with_capacity(batch_size),
            summary: UploadSummary::default(),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Sections buffered but not yet sent
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Buffer a section, sending the batch once it is full
    pub async fn push(&mut self, section: Section) -> Result<()> {
        self.pending.push(section);
        if self.pending.len() >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Send whatever is buffered
    pub async fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let batch = mem::replace(&mut self.pending, Vec::with_capacity(self.batch_size));
        let results = self.index.upload_documents(&batch).await?;
        let report = summarize(self.summary.batches.len(), &batch, results);

        tracing::info!(
            "Indexed {} sections, {} succeeded",
            report.submitted,
            report.succeeded
        );
        for failure in &report.failures {
            tracing::warn!(
                "Section {} rejected: {}",
                failure.key,
                failure.error_message.as_deref().unwrap_or("unknown reason")
            );
        }

        self.summary.batches.push(report);
        Ok(())
    }

    /// Send the final partial batch and return the per-batch reports
    pub async fn finish(mut self) -> Result<UploadSummary> {
        self.flush().await?;
        Ok(self.summary)
    }
}

fn summarize(batch: usize, sections: &[Section], results: Vec<IndexingResult>) -> BatchReport {
    let reported: HashSet<&str> = results.iter().map(|r| r.key.as_str()).collect();
    // Items the index did not report on are counted as failed
    let missing: Vec<IndexingResult> = sections
        .iter()
        .filter(|s| !reported.contains(s.id.as_str()))
        .map(|s| IndexingResult::failure(&s.id, "no result reported"))
        .collect();

    let (succeeded, mut failures): (Vec<_>, Vec<_>) =
        results.into_iter().partition(|r| r.succeeded);
    failures.extend(missing);

    BatchReport {
        batch,
        submitted: sections.len(),
        succeeded: succeeded.len().min(sections.len()),
        failures,
    }
}

/// Upload all sections in batches of `batch_size`
pub async fn upload_all(
    index: &dyn SearchIndex,
    sections: impl IntoIterator<Item = Section>,
    batch_size: usize,
) -> Result<UploadSummary> {
    let mut uploader = BatchUploader::new(index, batch_size);
    for section in sections {
        uploader.push(section).await?;
    }
    uploader.finish().await
}
