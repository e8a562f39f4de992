//! Tests for init-index CLI command

use crate::common::local_config;
use docindex::cli::commands::init_index::{execute, InitIndexArgs};
use docindex::cli::OutputFormat;
use docindex::core::storage::TantivyIndex;
use tempfile::TempDir;

fn local_index(temp: &TempDir) -> TantivyIndex {
    let config = local_config(temp);
    TantivyIndex::new(&config.index.local_dir, &config.index.index_name)
}

#[tokio::test]
async fn test_init_index_creates_definition() {
    let temp = TempDir::new().unwrap();
    let config = local_config(&temp);
    let index = local_index(&temp);

    let result = execute(InitIndexArgs::default(), &config, &index, OutputFormat::Human).await;
    assert!(result.is_ok(), "init-index should succeed: {:?}", result.err());

    let definition = index.definition().unwrap();
    assert_eq!(definition.name, "test-docs");
    assert_eq!(
        definition.field("embedding").unwrap().dimensions,
        Some(config.embedding.dimensions)
    );
}

#[tokio::test]
async fn test_init_index_twice_suggests_update() {
    let temp = TempDir::new().unwrap();
    let config = local_config(&temp);
    let index = local_index(&temp);

    execute(InitIndexArgs::default(), &config, &index, OutputFormat::Json)
        .await
        .unwrap();
    let err = execute(InitIndexArgs::default(), &config, &index, OutputFormat::Json)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("already exists"), "got: {message}");
    assert!(message.contains("--update"), "got: {message}");
}

#[tokio::test]
async fn test_init_index_update_overrides_dimensions() {
    let temp = TempDir::new().unwrap();
    let config = local_config(&temp);
    let index = local_index(&temp);

    execute(InitIndexArgs::default(), &config, &index, OutputFormat::Human)
        .await
        .unwrap();

    let args = InitIndexArgs {
        update: true,
        dimensions: Some(3072),
    };
    execute(args, &config, &index, OutputFormat::Json)
        .await
        .unwrap();

    let definition = index.definition().unwrap();
    assert_eq!(definition.field("embedding").unwrap().dimensions, Some(3072));
}

#[tokio::test]
async fn test_init_index_rejects_zero_dimensions() {
    let temp = TempDir::new().unwrap();
    let config = local_config(&temp);
    let index = local_index(&temp);

    let args = InitIndexArgs {
        update: false,
        dimensions: Some(0),
    };
    assert!(execute(args, &config, &index, OutputFormat::Human)
        .await
        .is_err());
    assert!(!index.exists());
}
