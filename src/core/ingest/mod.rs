//! Document ingestion.
//!
//! Turns documents into uploaded sections:
//!
//! - **walker**: resolve an input path to documents
//! - **extractor**: per-page text (PDF, plain text)
//! - **page_map**: page offsets within the concatenated text
//! - **splitter**: overlapping, boundary-aware segmentation
//! - **section**: keys, provenance labels and embeddings
//! - **uploader**: batched index upload
//! - **pipeline**: the end-to-end run

pub mod extractor;
pub mod page_map;
pub mod pipeline;
pub mod section;
pub mod splitter;
pub mod uploader;
pub mod walker;

pub use extractor::{extractor_for, PageExtractor, PdfExtractor, PlainTextExtractor};
pub use page_map::{find_page, PageMap};
pub use pipeline::{load_page_map, preview_file, IngestPipeline, SectionPreview};
pub use section::{
    assemble_section, decode_file_id, file_id, section_id, source_page, SectionAssembler,
};
pub use splitter::{Segment, Segments, TextSplitter, SENTENCE_ENDINGS, WORD_BREAKS};
pub use uploader::{upload_all, BatchUploader, DEFAULT_BATCH_SIZE};
pub use walker::DocumentWalker;
