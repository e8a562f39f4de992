//! Local tantivy backend through the service container

use crate::common::{create_local_services, local_config, TestDocs};
use docindex::core::error::DocIndexError;
use docindex::core::services::index_definition;
use docindex::core::storage::{CreateMode, SearchIndex, TantivyIndex};
use docindex::core::types::{HybridQuery, Section};
use tempfile::TempDir;

fn section(id: &str, content: &str, dims: usize) -> Section {
    Section {
        id: id.to_string(),
        content: content.to_string(),
        embedding: vec![0.5; dims],
        sourcepage: "doc-0.txt".to_string(),
        sourcefile: "doc.txt".to_string(),
    }
}

fn query(text: &str, dims: usize) -> HybridQuery {
    HybridQuery {
        text: text.to_string(),
        vector: vec![0.5; dims],
        top: 10,
        k: 50,
        vector_field: "embedding".to_string(),
    }
}

#[tokio::test]
async fn test_documents_persist_across_instances() {
    let temp_dir = TempDir::new().unwrap();
    let config = local_config(&temp_dir);
    let dims = config.embedding.dimensions;

    let index = TantivyIndex::new(&config.index.local_dir, &config.index.index_name);
    index
        .create_index(&index_definition(&config), CreateMode::Create)
        .await
        .unwrap();
    index
        .upload_documents(&[section("a", "hydraulic pump", dims)])
        .await
        .unwrap();

    let reopened = TantivyIndex::new(&config.index.local_dir, &config.index.index_name);
    assert!(reopened.exists());
    assert_eq!(reopened.definition().unwrap(), index_definition(&config));

    let hits = reopened.search(&query("pump", dims)).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "a");
    assert_eq!(hits[0].sourcefile, "doc.txt");
}

#[tokio::test]
async fn test_reingest_replaces_sections() {
    let docs = TestDocs::with_files(&[("manual.txt", "Check the hydraulic pump daily.")]);
    let (services, _temp) = create_local_services().await;

    for _ in 0..3 {
        let pipeline = services.create_pipeline().unwrap();
        pipeline.ingest_path(docs.path()).await.unwrap();
    }

    let response = services.search.search("pump", Some(10), None).await.unwrap();
    assert_eq!(response.count, 1, "sections should be upserted by key");
}

#[tokio::test]
async fn test_update_with_changed_dimensions_rebuilds() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = local_config(&temp_dir);
    let index = TantivyIndex::new(&config.index.local_dir, &config.index.index_name);

    index
        .create_index(&index_definition(&config), CreateMode::Create)
        .await
        .unwrap();
    index
        .upload_documents(&[section("a", "text", config.embedding.dimensions)])
        .await
        .unwrap();

    config.embedding.dimensions = 8;
    index
        .create_index(&index_definition(&config), CreateMode::CreateOrUpdate)
        .await
        .unwrap();

    let stored = index.definition().unwrap();
    assert_eq!(stored.field("embedding").unwrap().dimensions, Some(8));
    let hits = index.search(&query("text", 8)).await.unwrap();
    assert!(hits.is_empty(), "rebuilt index starts empty");

    // Old-width vectors are now rejected per item
    let results = index
        .upload_documents(&[section("b", "text", 32), section("c", "text", 8)])
        .await
        .unwrap();
    assert!(!results[0].succeeded);
    assert!(results[1].succeeded);
}

#[tokio::test]
async fn test_update_with_same_definition_keeps_documents() {
    let (services, _temp) = create_local_services().await;
    let dims = services.config.embedding.dimensions;
    services
        .index
        .upload_documents(&[section("a", "rudder", dims)])
        .await
        .unwrap();

    services
        .index
        .create_index(&index_definition(&services.config), CreateMode::CreateOrUpdate)
        .await
        .unwrap();

    let hits = services.index.search(&query("rudder", dims)).await.unwrap();
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn test_create_twice_conflicts() {
    let (services, _temp) = create_local_services().await;
    let err = services
        .index
        .create_index(&index_definition(&services.config), CreateMode::Create)
        .await
        .unwrap_err();

    assert!(matches!(err, DocIndexError::IndexAlreadyExists(_)));
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_upload_before_create_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let index = TantivyIndex::new(temp_dir.path(), "never-created");

    let err = index
        .upload_documents(&[section("a", "text", 4)])
        .await
        .unwrap_err();
    assert!(matches!(err, DocIndexError::IndexNotFound(_)));
    assert!(err.is_not_found());
}
