//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Media Ingest - Load scraped films and episodes into your database
#[derive(Parser, Debug)]
#[command(name = "media-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: <config dir>/media_ingest/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest scraped items from a JSON file or directory
    Ingest {
        /// Scraped item file, or directory searched for *.json
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Run against an in-memory store; nothing is written
        #[arg(long)]
        dry_run: bool,

        /// Keep upstream cover URLs instead of caching covers
        #[arg(long)]
        no_covers: bool,
    },

    /// Delete every row from the configured tables
    Reset {
        /// Confirm deletion
        #[arg(long)]
        confirm: bool,
    },

    /// Check that the database and cover directory are usable
    Check,
}
