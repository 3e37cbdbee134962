//! Clap argument definitions for the `folio` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Full-text indexing and search for local documents")]
pub struct Cli {
    /// Verbosity level (-v for info logs, -vv for debug logs)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared flag selecting the index location.
#[derive(Args, Debug, Clone, Default)]
pub struct IndexDirArgs {
    /// Index directory [default: .folio/index under the config root]
    #[arg(long, value_name = "DIR")]
    pub index_dir: Option<PathBuf>,
}

/// Shared flag for machine-readable output.
#[derive(Args, Debug, Clone, Default)]
pub struct JsonArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `folio index`.
#[derive(Args, Debug, Clone)]
pub struct IndexCommand {
    /// File or directory to index
    pub path: PathBuf,

    /// Skip files larger than this many bytes [default: from config]
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Tokenizer for a new index: "default" or "cjk" [default: from config]
    #[arg(long)]
    pub tokenizer: Option<String>,

    /// Index location.
    #[command(flatten)]
    pub index: IndexDirArgs,
}

/// Arguments for `folio search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Query, e.g. `revenue AND fileName:report*`
    #[arg(required = true)]
    pub query: String,

    /// Maximum results to return [default: from config]
    #[arg(short = 'n', long)]
    pub max_results: Option<usize>,

    /// Index location.
    #[command(flatten)]
    pub index: IndexDirArgs,

    /// Output format.
    #[command(flatten)]
    pub output: JsonArgs,
}

/// Arguments for `folio list`.
#[derive(Args, Debug, Clone)]
pub struct ListCommand {
    /// Maximum documents to list [default: from config]
    #[arg(short = 'n', long)]
    pub max_results: Option<usize>,

    /// Index location.
    #[command(flatten)]
    pub index: IndexDirArgs,

    /// Output format.
    #[command(flatten)]
    pub output: JsonArgs,
}

/// Arguments for `folio stats`.
#[derive(Args, Debug, Clone)]
pub struct StatsCommand {
    /// Index location.
    #[command(flatten)]
    pub index: IndexDirArgs,

    /// Output format.
    #[command(flatten)]
    pub output: JsonArgs,
}

/// Arguments for `folio clear`.
#[derive(Args, Debug, Clone)]
pub struct ClearCommand {
    /// Index location.
    #[command(flatten)]
    pub index: IndexDirArgs,
}

/// Supported `folio` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Index a file or directory, replacing earlier versions of the same files
    Index(IndexCommand),

    /// Search the index
    Search(SearchCommand),

    /// List indexed documents
    #[command(alias = "ls")]
    List(ListCommand),

    /// Show index statistics
    Stats(StatsCommand),

    /// Remove every document from the index
    Clear(ClearCommand),
}
