//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod completions;
pub mod config;
pub mod ingest;
pub mod init_index;
pub mod search;
pub mod split;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use ingest::IngestArgs;
pub use init_index::InitIndexArgs;
pub use search::SearchArgs;
pub use split::SplitArgs;
