//! Per-page text extraction.
//!
//! Produces one string per page, in page order, for the page map
//! builder. PDFs go through `lopdf`; plain-text documents use form
//! feeds as page separators.

use std::fs;
use std::path::Path;

use lopdf::Document;

use crate::core::error::{DocIndexError, Result};

/// Page separator for plain-text documents
pub const FORM_FEED: char = '\x0C';

/// Source of per-page text
pub trait PageExtractor: Send + Sync {
    /// Extract the text of every page, in page order
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// PDF extraction backed by `lopdf`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PageExtractor for PdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let doc = Document::load(path).map_err(|e| {
            DocIndexError::ExtractionFailed(format!("Cannot read PDF {}: {e}", path.display()))
        })?;

        let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();

        let pages = page_numbers
            .into_iter()
            .map(|number| {
                doc.extract_text(&[number]).unwrap_or_else(|e| {
                    tracing::warn!(
                        "No text extracted from page {} of {}: {}",
                        number,
                        path.display(),
                        e
                    );
                    String::new()
                })
            })
            .collect::<Vec<_>>();

        tracing::debug!("Extracted {} pages from {}", pages.len(), path.display());
        Ok(pages)
    }
}

/// Plain-text extraction; `\x0C` separates pages
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl PageExtractor for PlainTextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>> {
        let text = fs::read_to_string(path).map_err(|e| {
            DocIndexError::ExtractionFailed(format!("Cannot read {}: {e}", path.display()))
        })?;
        Ok(text.split(FORM_FEED).map(str::to_string).collect())
    }
}

/// Pick an extractor by file extension (case-insensitive)
pub fn extractor_for(path: &Path) -> Result<Box<dyn PageExtractor>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => Ok(Box::new(PdfExtractor)),
        Some("txt") | Some("md") => Ok(Box::new(PlainTextExtractor)),
        _ => Err(DocIndexError::ExtractionFailed(format!(
            "Unsupported document type: {}",
            path.display()
        ))),
    }
}
