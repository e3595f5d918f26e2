use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// CLI arguments for geokey
#[derive(Debug, Parser)]
#[command(
    name = "geokey",
    version,
    about = "Search and inspect a multilingual geographic name database"
)]
pub struct CliArgs {
    /// Path to the input CSV (denormalized or tree flavor, sniffed from the header)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show registry and trie statistics
    Stats,

    /// Run one query and print the result envelope as JSON
    Search {
        /// Free-form query in either language
        query: String,

        /// Maximum results in the envelope
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Interactive query loop (empty input exits)
    Repl,

    /// Re-export the database to CSV
    Export {
        /// Output flavor
        #[arg(value_enum)]
        mode: ExportMode,

        /// Output path
        output: PathBuf,
    },

    /// Serve the search API over HTTP
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportMode {
    /// Rows repeat the full ancestor chain in the name columns
    Denorm,
    /// Rows carry an explicit geo_parent_id column
    Tree,
}
