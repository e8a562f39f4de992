//! Ingest command - split, embed and upload documents

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::IngestStats;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Document or directory of documents to ingest
    pub path: PathBuf,

    /// Maximum section length in characters
    #[arg(long)]
    pub max_section_length: Option<usize>,

    /// How far to look past a section's end for a sentence ending
    #[arg(long)]
    pub sentence_search_limit: Option<usize>,

    /// Characters shared by consecutive sections
    #[arg(long)]
    pub section_overlap: Option<usize>,

    /// Sections per upload call
    #[arg(long, short = 'b')]
    pub batch_size: Option<usize>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Ingest result response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub index: String,
    pub path: String,
    #[serde(flatten)]
    pub stats: IngestStats,
    pub sections_uploaded: usize,
    pub sections_rejected: usize,
}

/// Execute the ingest command
pub async fn execute(
    args: IngestArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = (*services.config).clone();
    if let Some(v) = args.max_section_length {
        config.splitting.max_section_length = v;
    }
    if let Some(v) = args.sentence_search_limit {
        config.splitting.sentence_search_limit = v;
    }
    if let Some(v) = args.section_overlap {
        config.splitting.section_overlap = v;
    }
    if let Some(v) = args.batch_size {
        config.index.batch_size = v;
    }
    config.validate()?;

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Ingesting {} into {}...",
            colors::file_path(&args.path.display().to_string()),
            colors::index_name(services.index.name())
        );
    }

    let pipeline = services.create_pipeline_with(&config.splitting, config.index.batch_size)?;
    let stats = pipeline.ingest_path(&args.path).await?;

    let response = IngestResponse {
        index: services.index.name().to_string(),
        path: args.path.display().to_string(),
        sections_uploaded: stats.upload.succeeded(),
        sections_rejected: stats.upload.failed(),
        stats,
    };

    match format {
        OutputFormat::Human => print_human(&response, args.quiet),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
    }

    Ok(())
}

fn print_human(response: &IngestResponse, quiet: bool) {
    let stats = &response.stats;

    if !quiet {
        for batch in &stats.upload.batches {
            println!(
                "  batch {}: {} sections, {} succeeded",
                batch.batch,
                colors::number(&batch.submitted.to_string()),
                colors::number(&batch.succeeded.to_string())
            );
        }
    }

    println!(
        "{} {} files ({} pages, {} sections) in {}",
        colors::success("Ingested"),
        colors::number(&stats.files_ingested.to_string()),
        colors::number(&stats.pages_extracted.to_string()),
        colors::number(&stats.sections_created.to_string()),
        format_duration(stats.duration_ms as f64 / 1000.0)
    );
    println!(
        "{} {}",
        colors::label("Started:"),
        colors::dim(&stats.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    );

    if response.sections_rejected > 0 {
        println!(
            "{} {} sections rejected by the index:",
            colors::warning("Warning:"),
            response.sections_rejected
        );
        for failure in stats.upload.batches.iter().flat_map(|b| &b.failures) {
            println!(
                "  {} {}",
                failure.key,
                colors::dim(failure.error_message.as_deref().unwrap_or("unknown reason"))
            );
        }
    }
}
