//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Grounded question answering over plain-text document collections
#[derive(Parser)]
#[command(
    name = "ragline",
    version = env!("CARGO_PKG_VERSION"),
    about = "Grounded question answering over plain-text document collections",
    long_about = "Index a directory of plain-text documents, then ask questions \
answered from the retrieved context with source citations.",
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to a custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .ragline directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Build the vector index from a document directory
    #[command(about = "Chunk, embed and index every plain-text file under DIR")]
    Index {
        /// Directory containing the document corpus
        #[arg(value_name = "DIR")]
        doc_root: PathBuf,

        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Retrieve matching chunks without generating an answer
    #[command(about = "Show the ranked chunks a question would be grounded on")]
    Search {
        /// Natural-language query
        query: String,

        /// Maximum number of results (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask a question against the indexed corpus
    #[command(about = "Answer a question from retrieved context, with citations")]
    Ask {
        /// Natural-language question
        question: String,

        /// Number of context chunks to retrieve (overrides config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Summarize query logs
    #[command(about = "Aggregate statistics over a JSON query-log file")]
    Stats {
        /// Path to the JSON log file
        log_file: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show current configuration
    Config,
}
