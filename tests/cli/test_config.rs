//! Tests for show-config CLI command

use docindex::cli::commands::config::{execute, redacted, ConfigArgs};
use docindex::cli::OutputFormat;
use docindex::core::config::Config;
use docindex::core::xdg::XdgDirs;

fn config_with_keys() -> Config {
    let mut config = Config::default();
    config.embedding.api_key = "embedding-secret-key".to_string();
    config.index.api_key = "search-secret-key".to_string();
    config
}

#[test]
fn test_show_config_human() {
    let result = execute(
        ConfigArgs { paths: false },
        &config_with_keys(),
        &XdgDirs::new(),
        OutputFormat::Human,
    );
    assert!(result.is_ok(), "show-config should succeed: {:?}", result.err());
}

#[test]
fn test_show_config_json_with_paths() {
    let result = execute(
        ConfigArgs { paths: true },
        &config_with_keys(),
        &XdgDirs::new(),
        OutputFormat::Json,
    );
    assert!(result.is_ok(), "show-config should succeed: {:?}", result.err());
}

#[test]
fn test_redacted_hides_api_keys() {
    let config = config_with_keys();
    let shown = redacted(&config);

    assert_ne!(shown.embedding.api_key, config.embedding.api_key);
    assert_ne!(shown.index.api_key, config.index.api_key);
    assert!(!toml::to_string(&shown).unwrap().contains("secret-key"));

    // Everything else is shown as configured
    assert_eq!(shown.index.index_name, config.index.index_name);
    assert_eq!(
        shown.splitting.max_section_length,
        config.splitting.max_section_length
    );
}
