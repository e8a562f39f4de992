//! Show-config command - show current configuration

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::{redact, Config};
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the show-config command
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Also show where configuration and data are read from
    #[arg(long, short = 'p')]
    pub paths: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    #[serde(flatten)]
    pub config: Config,
}

/// Copy of `config` with credentials masked
pub fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    shown.embedding.api_key = redact(&config.embedding.api_key);
    shown.index.api_key = redact(&config.index.api_key);
    shown
}

/// Execute the show-config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = ConfigResponse {
        config_file: args
            .paths
            .then(|| xdg.config_file().to_string_lossy().into_owned()),
        data_dir: args
            .paths
            .then(|| xdg.data_dir.to_string_lossy().into_owned()),
        config: redacted(config),
    };

    match format {
        OutputFormat::Human => {
            if let (Some(file), Some(dir)) = (&response.config_file, &response.data_dir) {
                println!("{} {}", colors::label("config file:"), file);
                println!("{} {}", colors::label("data dir:"), dir);
                println!();
            }
            print!("{}", toml::to_string_pretty(&response.config)?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
