//! CLI adapter for docindex
//!
//! Thin clap layer over `core/`: each subcommand parses its
//! arguments, builds the collaborators it needs and prints the
//! result as human-readable text or JSON.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// docindex - document ingestion for hybrid search
///
/// Split documents into overlapping sections, embed them and upload
/// them to a search index queried with keywords and vectors at once.
#[derive(Parser, Debug)]
#[command(name = "docindex")]
#[command(version)]
#[command(about = "Ingest documents into a hybrid search index", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the search index with its vector search configuration
    #[command(name = "init-index")]
    InitIndex(commands::InitIndexArgs),

    /// Split, embed and upload a document or a directory of documents
    Ingest(commands::IngestArgs),

    /// Show how a document would be split, without embedding or uploading
    Split(commands::SplitArgs),

    /// Run a hybrid keyword + vector query
    Search(commands::SearchArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  docindex completions bash > ~/.local/share/bash-completion/completions/docindex
    ///   zsh:   docindex completions zsh > ~/.zfunc/_docindex
    ///   fish:  docindex completions fish > ~/.config/fish/completions/docindex.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::{build_index, Services};
    use crate::core::xdg::XdgDirs;

    // Handle completions command early (doesn't need configuration)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    // Credentials may come from a .env file; a missing file is fine
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {:?}", path);
    }

    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;
    let config = Config::load_with_xdg(&xdg)?;

    match cli.command {
        Commands::InitIndex(args) => {
            config.log_config();
            let index = build_index(&config.index)?;
            commands::init_index::execute(args, &config, index.as_ref(), cli.format).await
        }
        Commands::Ingest(args) => {
            config.log_config();
            let services = Services::new(config)?;
            commands::ingest::execute(args, &services, cli.format).await
        }
        Commands::Split(args) => commands::split::execute(args, &config, cli.format),
        Commands::Search(args) => {
            let services = Services::new(config)?;
            commands::search::execute(args, &services, cli.format).await
        }
        Commands::ShowConfig(args) => commands::config::execute(args, &config, &xdg, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
