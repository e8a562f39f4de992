//! Search command - hybrid query against the index

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::single_line;
use clap::Args;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Number of results to return
    #[arg(long, short = 'n')]
    pub top: Option<usize>,

    /// Nearest neighbours considered by the vector search
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,

    /// Maximum characters of content shown per hit (0 = all)
    #[arg(long, default_value = "0")]
    pub max_chars: usize,
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = services
        .search
        .search(&args.query, args.top, args.top_k)
        .await?;

    match format {
        OutputFormat::Human => {
            if response.results.is_empty() {
                println!("No results for {:?}", response.query);
                return Ok(());
            }
            for (rank, hit) in response.results.iter().enumerate() {
                println!(
                    "{} {}: {} {}",
                    colors::rank(&format!("{}.", rank + 1)),
                    colors::file_path(&hit.sourcepage),
                    truncate(&single_line(&hit.content), args.max_chars),
                    colors::score(&format!("({:.4})", hit.score))
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Shorten `text` to `max` chars with an ellipsis; 0 keeps it whole
fn truncate(text: &str, max: usize) -> String {
    if max == 0 || text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max).collect();
    short.push_str("...");
    short
}
