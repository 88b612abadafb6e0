//! Media Ingest CLI
//!
//! A command-line tool for ingesting scraped film and TV show metadata into a relational store.

use anyhow::Context;
use clap::Parser;
use media_ingest::cli::{
    args::{Cli, Commands},
    commands::{ingest, reset},
};
use media_ingest::models::config::{self, Config};
use media_ingest::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let config = match cli.config.as_deref() {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => config::load_config(),
    };

    // Run the appropriate command
    match cli.command {
        Commands::Ingest {
            path,
            dry_run,
            no_covers,
        } => {
            if !dry_run {
                run_preflight_checks(&config)?;
            }
            ingest::ingest(&config, &path, dry_run, no_covers)
                .await
                .context("Ingestion aborted")?;
        }

        Commands::Reset { confirm } => {
            reset::reset(&config, confirm).context("Reset failed")?;
        }

        Commands::Check => {
            run_preflight_checks(&config)?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("media_ingest=debug")
    } else {
        EnvFilter::new("media_ingest=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
fn run_preflight_checks(config: &Config) -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config);
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
