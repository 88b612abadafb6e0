//! Ingest command implementation.
//!
//! Loads scraped items from disk and runs them through the ingestion
//! pipeline one after another.

use crate::core::film::FilmOutcome;
use crate::core::ingest::{IngestReport, Ingestor};
use crate::core::scanner;
use crate::core::writer::WriteOutcome;
use crate::models::config::Config;
use crate::services::cover::CoverCache;
use crate::services::error_log::{CollectedErrors, ErrorSink, FileErrorLog};
use crate::store::{MemoryStore, SqliteStore, Store};
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Counters for one ingest run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub inserted: usize,
    pub existing: usize,
    pub failed: usize,
    pub skipped: usize,
    pub episodes_created: usize,
    pub episodes_updated: usize,
    pub episodes_unchanged: usize,
}

impl IngestSummary {
    /// Count one item's report.
    pub fn record(&mut self, report: &IngestReport) {
        match report.film {
            FilmOutcome::Inserted(_) => self.inserted += 1,
            FilmOutcome::Existing(_) => self.existing += 1,
            FilmOutcome::Failed => self.failed += 1,
        }
        match report.episodes {
            Some(WriteOutcome::Created) => self.episodes_created += 1,
            Some(WriteOutcome::Updated) => self.episodes_updated += 1,
            Some(WriteOutcome::Unchanged) => self.episodes_unchanged += 1,
            None => {}
        }
    }

    fn print(&self) {
        println!("{}", "[Summary]".bold().yellow());
        println!("  {} {}", "Films inserted:".bold(), self.inserted);
        println!("  {} {}", "Films existing:".bold(), self.existing);
        if self.failed > 0 {
            println!("  {} {}", "Films failed:".bold(), self.failed.to_string().red());
        }
        if self.skipped > 0 {
            println!("  {} {}", "Files skipped:".bold(), self.skipped.to_string().red());
        }
        println!(
            "  {} {} created, {} updated, {} unchanged",
            "Episodes:".bold(),
            self.episodes_created,
            self.episodes_updated,
            self.episodes_unchanged
        );
    }
}

/// Ingest every scraped item under `path`.
pub async fn ingest(config: &Config, path: &Path, dry_run: bool, no_covers: bool) -> Result<IngestSummary> {
    println!("{}", "[INGEST] Ingesting scraped items...".bold().cyan());
    println!();

    let items = scanner::find_items(path)?;
    if items.is_empty() {
        println!("[INFO] No scraped items found in {}", path.display());
        return Ok(IngestSummary::default());
    }

    let mut store: Box<dyn Store> = if dry_run {
        println!("{}", "[DRY RUN] Using an in-memory store".bold().yellow());
        Box::new(MemoryStore::new())
    } else {
        println!("[INFO] Database: {}", config.storage.database.display());
        Box::new(SqliteStore::open(&config.storage.database, &config.storage.tables)?)
    };

    let file_log = FileErrorLog::new(config.log_dir.clone());
    let collected = CollectedErrors::new();
    let errors: &dyn ErrorSink = if dry_run { &collected } else { &file_log };

    let covers = (config.cover.enabled && !no_covers && !dry_run)
        .then(|| CoverCache::new(config.cover.clone()));
    let mut ingestor = Ingestor::new(config, errors);
    if let Some(covers) = covers.as_ref() {
        ingestor = ingestor.with_covers(covers);
    }

    let pb = ProgressBar::new(items.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut summary = IngestSummary::default();
    for item_path in &items {
        pb.set_message(
            item_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        );

        let item = match scanner::load_item(item_path) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", item_path.display(), e);
                summary.skipped += 1;
                pb.inc(1);
                continue;
            }
        };

        // Storage outages abort the run.
        let report = ingestor.ingest(store.as_mut(), item).await?;
        summary.record(&report);
        pb.inc(1);
    }
    pb.finish_and_clear();

    summary.print();
    if summary.failed > 0 && !dry_run {
        println!(
            "  {} {}",
            "Failures logged to:".bold(),
            file_log.path_for(&config.ingest.error_log).display()
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(film: FilmOutcome, episodes: Option<WriteOutcome>) -> IngestReport {
        IngestReport {
            title: "Dark".to_string(),
            film,
            episodes,
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = IngestSummary::default();
        summary.record(&report(FilmOutcome::Inserted(1), Some(WriteOutcome::Created)));
        summary.record(&report(FilmOutcome::Existing(1), Some(WriteOutcome::Unchanged)));
        summary.record(&report(FilmOutcome::Existing(1), Some(WriteOutcome::Updated)));
        summary.record(&report(FilmOutcome::Failed, None));

        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.existing, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.episodes_created, 1);
        assert_eq!(summary.episodes_updated, 1);
        assert_eq!(summary.episodes_unchanged, 1);
    }
}
