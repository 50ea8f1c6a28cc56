//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the Pivotal Tracker v5 API
#[derive(Parser, Debug)]
#[command(name = "tracker-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the user the token belongs to
    Me,

    /// List the stories of a project
    Stories {
        /// Project ID
        #[arg(short, long)]
        project: u64,

        /// Tracker search filter (e.g. "state:started label:backend")
        #[arg(long)]
        filter: Option<String>,

        /// Stories per page (0 = everything in one request)
        #[arg(long)]
        page_size: Option<u32>,

        /// Stop after this many stories
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the activity feed of a project
    Activity {
        /// Project ID
        #[arg(short, long)]
        project: u64,

        /// Sort order: asc or desc
        #[arg(long)]
        sort_order: Option<String>,

        /// Only activity newer than this project version
        #[arg(long)]
        since_version: Option<u64>,
    },

    /// Fetch stories with their comments and reviews through the aggregator
    Aggregate {
        /// Project ID
        #[arg(short, long)]
        project: u64,

        /// Story IDs (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        stories: Vec<u64>,

        /// Sub-requests per aggregator call
        #[arg(long)]
        batch_size: Option<usize>,

        /// Correlate fragments by story ID instead of by URL
        #[arg(long)]
        by_id: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Human-readable output
    Pretty,
}
