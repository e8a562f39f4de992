//! Section assembly.
//!
//! Turns a [`Segment`] into an uploadable [`Section`]: a stable
//! document key derived from the file name, a `<stem>-<page><ext>`
//! provenance label, and the embedding of the section text.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::embedding::Embedder;
use crate::core::error::{DocIndexError, Result};
use crate::core::ingest::splitter::Segment;
use crate::core::types::Section;

static UNSAFE_KEY_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new("[^0-9a-zA-Z_-]").unwrap());

const FILE_ID_PREFIX: &str = "file-";

/// Derive the document key prefix for a file.
///
/// `file-<sanitized>-<HEX>`: the sanitized part keeps `[0-9a-zA-Z_-]`
/// and replaces everything else with `_`; the hex part is the
/// upper-case base16 of the raw UTF-8 name, so the name can be
/// recovered with [`decode_file_id`].
pub fn file_id(filename: &str) -> String {
    let sanitized = UNSAFE_KEY_CHARS.replace_all(filename, "_");
    let encoded = hex::encode_upper(filename.as_bytes());
    format!("{FILE_ID_PREFIX}{sanitized}-{encoded}")
}

/// Recover the original filename from a [`file_id`] value
pub fn decode_file_id(id: &str) -> Result<String> {
    let body = id
        .strip_prefix(FILE_ID_PREFIX)
        .ok_or_else(|| DocIndexError::InvalidQuery(format!("Not a file id: {id}")))?;
    // Hex digits never contain '-', so the encoding is the last component
    let (_, encoded) = body
        .rsplit_once('-')
        .ok_or_else(|| DocIndexError::InvalidQuery(format!("Not a file id: {id}")))?;
    let bytes = hex::decode(encoded)
        .map_err(|e| DocIndexError::InvalidQuery(format!("Bad file id encoding in {id}: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| DocIndexError::InvalidQuery(format!("File id {id} is not UTF-8: {e}")))
}

/// Document key of the `index`-th section of a file
pub fn section_id(file_id: &str, index: usize) -> String {
    format!("{file_id}-page-{index}")
}

/// `<stem>-<page><.ext>` label for a page of `filename`
pub fn source_page(filename: &str, page: usize) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{stem}-{page}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{page}"),
    }
}

/// Text sent to the embedding service: line breaks become spaces
pub fn embedding_input(text: &str) -> String {
    text.replace('\n', " ")
}

/// Embed one segment and build its [`Section`]
pub async fn assemble_section(
    segment: Segment,
    index: usize,
    file_id: &str,
    filename: &str,
    embedder: &dyn Embedder,
) -> Result<Section> {
    let embedding = embedder.embed(&embedding_input(&segment.text)).await?;
    Ok(Section {
        id: section_id(file_id, index),
        sourcepage: source_page(filename, segment.page),
        sourcefile: filename.to_string(),
        content: segment.text,
        embedding,
    })
}

/// Builds [`Section`]s for one file
#[derive(Debug, Clone)]
pub struct SectionAssembler {
    filename: String,
    file_id: String,
}

impl SectionAssembler {
    /// Assembler for sections of `filename` (kept verbatim as `sourcefile`)
    pub fn new(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let file_id = file_id(&filename);
        Self { filename, file_id }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Embed the segment and build its section.
    ///
    /// An embedding failure is returned as-is; no section is built.
    pub async fn assemble(
        &self,
        segment: Segment,
        index: usize,
        embedder: &dyn Embedder,
    ) -> Result<Section> {
        tracing::debug!(
            "Embedding section {} of {} ({} chars, page {})",
            index,
            self.filename,
            segment.text.chars().count(),
            segment.page
        );
        assemble_section(segment, index, &self.file_id, &self.filename, embedder).await
    }
}
