//! docindex - command-line interface
//!
//! # Examples
//!
//! ```bash
//! # Create the index (once)
//! docindex init-index
//!
//! # Ingest a document or a directory of documents
//! docindex ingest ./data/handbook.pdf
//! docindex ingest ./data --batch-size 500
//!
//! # Preview the sections of a document
//! docindex split ./data/handbook.pdf
//!
//! # Query
//! docindex search "parental leave policy" --top 5
//! ```

use clap::Parser;
use docindex::cli::{run, Cli};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logs go to stderr so stdout stays clean for command output.
/// DOCINDEX_LOG_FORMAT=json switches to JSON lines.
fn init_tracing() {
    let json = std::env::var("DOCINDEX_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let (plain, structured) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "docindex=info".into()))
        .with(plain)
        .with(structured)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
