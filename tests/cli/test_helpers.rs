//! CLI test helpers
//!
//! Provides utilities for testing CLI commands including:
//! - Document directories with specific file content
//! - Local services with documents already ingested

use crate::common::{create_local_services, TestDocs};
use docindex::core::services::Services;
use tempfile::TempDir;

/// Aircraft manual pages used across CLI tests
pub const MANUAL: &[(&str, &str)] = &[
    (
        "manual/rudder.txt",
        "The rudder pedals move the rudder. Check the cable tension.",
    ),
    (
        "manual/fuel.md",
        "Fuel pressure must stay in the green arc.\x0CDrain the sumps before flight.",
    ),
    ("manual/photo.jpg", "not a document"),
];

/// Create a document directory with specified files
pub fn create_test_docs(files: &[(&str, &str)]) -> TestDocs {
    TestDocs::with_files(files)
}

/// Local services with `files` already ingested
pub async fn setup_ingested_services(files: &[(&str, &str)]) -> (Services, TempDir, TestDocs) {
    let docs = create_test_docs(files);
    let (services, temp) = create_local_services().await;

    services
        .create_pipeline()
        .expect("Pipeline creation should succeed")
        .ingest_path(docs.path())
        .await
        .expect("Ingest should succeed");

    (services, temp, docs)
}
