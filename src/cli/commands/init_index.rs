//! Init-index command - provision the search index

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::index_definition;
use crate::core::storage::{CreateMode, IndexDefinition, SearchIndex};
use clap::Args;
use serde::Serialize;

/// Arguments for the init-index command
#[derive(Args, Debug, Default)]
pub struct InitIndexArgs {
    /// Update the definition of an existing index instead of failing
    #[arg(long, short = 'u')]
    pub update: bool,

    /// Embedding dimensions (defaults to the configured value)
    #[arg(long)]
    pub dimensions: Option<usize>,
}

/// Init-index response
#[derive(Debug, Serialize)]
pub struct InitIndexResponse {
    pub index: String,
    pub updated: bool,
    pub definition: IndexDefinition,
}

/// Execute the init-index command
pub async fn execute(
    args: InitIndexArgs,
    config: &Config,
    index: &dyn SearchIndex,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut definition = index_definition(config);
    definition.name = index.name().to_string();

    if let Some(dimensions) = args.dimensions {
        if dimensions == 0 {
            return Err("Dimensions must be at least 1.".into());
        }
        for field in definition.fields.iter_mut().filter(|f| f.is_vector()) {
            field.dimensions = Some(dimensions);
        }
    }

    let mode = if args.update {
        CreateMode::CreateOrUpdate
    } else {
        CreateMode::Create
    };

    index.create_index(&definition, mode).await.map_err(|e| {
        if e.is_conflict() {
            format!("{e}. Use --update to update the existing index definition.")
        } else {
            e.to_string()
        }
    })?;

    let response = InitIndexResponse {
        index: definition.name.clone(),
        updated: args.update,
        definition,
    };

    match format {
        OutputFormat::Human => {
            let verb = if response.updated { "Updated" } else { "Created" };
            println!(
                "{} index {}",
                colors::success(verb),
                colors::index_name(&response.index)
            );
            for field in &response.definition.fields {
                println!("  {:<12} {}", field.name, colors::dim(&field.field_type));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
