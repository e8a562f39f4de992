//! End-to-end pipeline runs against in-memory collaborators

use crate::common::{
    assert_valid_stats, FailingEmbedder, HashEmbedder, RecordingIndex, TestDocs,
};
use docindex::core::embedding::Embedder;
use docindex::core::error::DocIndexError;
use docindex::core::ingest::{
    decode_file_id, file_id, upload_all, DocumentWalker, IngestPipeline, TextSplitter,
};
use docindex::core::storage::SearchIndex;

fn walker() -> DocumentWalker {
    DocumentWalker::new(&["*.txt".to_string(), "*.md".to_string()], &[], 10).unwrap()
}

fn build_pipeline<'a>(
    splitter: TextSplitter,
    embedder: &'a dyn Embedder,
    index: &'a dyn SearchIndex,
    batch_size: usize,
) -> IngestPipeline<'a> {
    IngestPipeline::new(splitter, walker(), embedder, index, batch_size)
}

fn manual_docs() -> TestDocs {
    let page = "Inspect the landing gear before every flight. Check the fuel pressure valve. ";
    let manual = format!("{}\x0C{}", page.repeat(6), page.repeat(6));
    TestDocs::with_files(&[
        ("b_manual.txt", manual.as_str()),
        ("a_notes.md", "Short note on the rudder."),
        ("ignored.csv", "not,a,document"),
        (".hidden/secret.txt", "should never be read"),
    ])
}

#[tokio::test]
async fn test_pipeline_ingests_directory_in_path_order() {
    let docs = manual_docs();
    let embedder = HashEmbedder::new(16);
    let index = RecordingIndex::default();

    let pipeline = build_pipeline(TextSplitter::new(200, 20, 20), &embedder, &index, 5);
    let stats = pipeline.ingest_path(docs.path()).await.unwrap();

    assert_valid_stats(&stats);
    assert_eq!(stats.files_ingested, 2);
    assert_eq!(stats.pages_extracted, 3);
    assert_eq!(stats.upload.failed(), 0);
    assert!(stats.started_at <= chrono::Utc::now());

    let sections = index.sections();
    assert_eq!(sections.len(), stats.sections_created);
    assert_eq!(embedder.call_count(), sections.len());

    // a_notes.md sorts first and fits in one section
    let notes = docs.file("a_notes.md").to_string_lossy().into_owned();
    assert_eq!(sections[0].sourcefile, notes);
    assert_eq!(sections[0].sourcepage, "a_notes-0.md");
    assert_eq!(sections[0].id, format!("{}-page-0", file_id(&notes)));
    assert!(sections.iter().all(|s| !s.content.contains("secret")));
}

#[tokio::test]
async fn test_pipeline_batches_span_files() {
    let docs = manual_docs();
    let embedder = HashEmbedder::new(16);
    let index = RecordingIndex::default();

    let pipeline = build_pipeline(TextSplitter::new(200, 20, 20), &embedder, &index, 5);
    let stats = pipeline.ingest_path(docs.path()).await.unwrap();

    let sizes = index.batch_sizes();
    let (last, full) = sizes.split_last().unwrap();
    assert!(full.iter().all(|&size| size == 5));
    assert!((1..=5).contains(last));
    assert_eq!(sizes.iter().sum::<usize>(), stats.sections_created);
    assert_eq!(stats.upload.batches.len(), sizes.len());
}

#[tokio::test]
async fn test_section_ids_are_sequential_per_file() {
    let docs = manual_docs();
    let embedder = HashEmbedder::new(16);
    let index = RecordingIndex::default();

    let pipeline = build_pipeline(TextSplitter::new(200, 20, 20), &embedder, &index, 100);
    pipeline.ingest_path(docs.path()).await.unwrap();

    let manual = docs.file("b_manual.txt").to_string_lossy().into_owned();
    let manual_id = file_id(&manual);
    let manual_sections: Vec<_> = index
        .sections()
        .into_iter()
        .filter(|s| s.sourcefile == manual)
        .collect();

    assert!(manual_sections.len() > 2);
    for (i, section) in manual_sections.iter().enumerate() {
        assert_eq!(section.id, format!("{manual_id}-page-{i}"));
        assert_eq!(section.embedding.len(), 16);
    }
    assert_eq!(decode_file_id(&manual_id).unwrap(), manual);

    // Pages are separated by a form feed; later sections start on page 1
    assert_eq!(manual_sections[0].sourcepage, "b_manual-0.txt");
    assert_eq!(
        manual_sections.last().unwrap().sourcepage,
        "b_manual-1.txt"
    );
}

#[tokio::test]
async fn test_embedding_input_has_no_newlines() {
    let docs = TestDocs::with_files(&[("lines.txt", "First line.\nSecond line.\nThird line.")]);
    let embedder = HashEmbedder::new(8);
    let index = RecordingIndex::default();

    let pipeline = build_pipeline(TextSplitter::default(), &embedder, &index, 10);
    pipeline.ingest_path(docs.path()).await.unwrap();

    let inputs = embedder.inputs.lock().unwrap().clone();
    assert_eq!(inputs, vec!["First line. Second line. Third line.".to_string()]);
    // Stored content keeps its line breaks
    assert!(index.sections()[0].content.contains('\n'));
}

#[tokio::test]
async fn test_rejected_sections_are_counted_not_fatal() {
    let docs = TestDocs::with_files(&[
        ("a.txt", "Accepted section."),
        ("b.txt", "REJECT this one."),
        ("c.txt", "Also accepted."),
    ]);
    let embedder = HashEmbedder::new(8);
    let index = RecordingIndex::rejecting("REJECT");

    let pipeline = build_pipeline(TextSplitter::default(), &embedder, &index, 2);
    let stats = pipeline.ingest_path(docs.path()).await.unwrap();

    assert_eq!(stats.upload.submitted(), 3);
    assert_eq!(stats.upload.succeeded(), 2);
    assert_eq!(stats.upload.failed(), 1);
    assert_eq!(index.batch_sizes(), vec![2, 1]);
    let failure = &stats.upload.batches[0].failures[0];
    assert!(failure.key.contains("-page-0"));
    assert_eq!(failure.error_message.as_deref(), Some("document rejected"));
}

#[tokio::test]
async fn test_embedding_failure_aborts_run() {
    let docs = TestDocs::with_files(&[("a.txt", "Some text.")]);
    let embedder = FailingEmbedder;
    let index = RecordingIndex::default();

    let pipeline = build_pipeline(TextSplitter::default(), &embedder, &index, 10);
    let err = pipeline.ingest_path(docs.path()).await.unwrap_err();

    assert!(matches!(err, DocIndexError::EmbeddingFailed(_)));
    assert!(index.batch_sizes().is_empty());
}

#[tokio::test]
async fn test_corrupt_pdf_aborts_run() {
    let docs = TestDocs::with_files(&[("broken.pdf", "this is not a pdf")]);
    let walker = DocumentWalker::new(&["*.pdf".to_string()], &[], 10).unwrap();
    let embedder = HashEmbedder::new(8);
    let index = RecordingIndex::default();

    let pipeline = IngestPipeline::new(TextSplitter::default(), walker, &embedder, &index, 10);
    let err = pipeline.ingest_path(docs.path()).await.unwrap_err();

    assert!(matches!(err, DocIndexError::ExtractionFailed(_)));
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn test_missing_path_is_invalid() {
    let docs = TestDocs::with_files(&[]);
    let embedder = HashEmbedder::new(8);
    let index = RecordingIndex::default();

    let pipeline = build_pipeline(TextSplitter::default(), &embedder, &index, 10);
    let err = pipeline
        .ingest_path(&docs.file("nowhere"))
        .await
        .unwrap_err();
    assert!(matches!(err, DocIndexError::InvalidPath(_)));
}

#[tokio::test]
async fn test_empty_directory_uploads_nothing() {
    let docs = TestDocs::with_files(&[("readme.csv", "a,b")]);
    let embedder = HashEmbedder::new(8);
    let index = RecordingIndex::default();

    let pipeline = build_pipeline(TextSplitter::default(), &embedder, &index, 10);
    let stats = pipeline.ingest_path(docs.path()).await.unwrap();

    assert_eq!(stats.files_ingested, 0);
    assert_eq!(stats.sections_created, 0);
    assert!(index.batch_sizes().is_empty());
}

#[tokio::test]
async fn test_upload_all_batches() {
    let docs = manual_docs();
    let embedder = HashEmbedder::new(4);
    let index = RecordingIndex::default();
    let pipeline = build_pipeline(TextSplitter::new(200, 20, 20), &embedder, &index, 1000);
    pipeline.ingest_path(docs.path()).await.unwrap();
    let sections = index.sections();

    let target = RecordingIndex::default();
    let summary = upload_all(&target, sections.clone(), 3).await.unwrap();

    assert_eq!(summary.submitted(), sections.len());
    assert_eq!(target.sections(), sections);
}
