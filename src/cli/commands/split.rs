//! Split command - preview sections without embedding or upload

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::ingest::{preview_file, DocumentWalker, SectionPreview, TextSplitter};
use crate::core::types::single_line;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Document or directory of documents to split
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
}

/// Sections of one document
#[derive(Debug, Serialize)]
pub struct SplitFile {
    pub file: String,
    pub sections: Vec<SectionPreview>,
}

/// Execute the split command
pub fn execute(
    args: SplitArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config.clone();
    if let Some(v) = args.max_section_length {
        config.splitting.max_section_length = v;
    }
    if let Some(v) = args.sentence_search_limit {
        config.splitting.sentence_search_limit = v;
    }
    if let Some(v) = args.section_overlap {
        config.splitting.section_overlap = v;
    }
    config.validate()?;

    let splitter = TextSplitter::from_config(&config.splitting);
    let files = DocumentWalker::from_config(&config.ingest)?.resolve(&args.path)?;

    let mut results = Vec::with_capacity(files.len());
    for file in &files {
        results.push(SplitFile {
            file: file.display().to_string(),
            sections: preview_file(&splitter, file)?,
        });
    }

    match format {
        OutputFormat::Human => {
            for result in &results {
                println!(
                    "{} ({} sections)",
                    colors::file_path(&result.file),
                    colors::number(&result.sections.len().to_string())
                );
                for section in &result.sections {
                    println!(
                        "  {} {} {}",
                        colors::label(&section.sourcepage),
                        colors::dim(&format!("[{}..{})", section.start, section.end)),
                        single_line(&section.content)
                    );
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
