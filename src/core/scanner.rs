//! Scraped item scanner.
//!
//! Finds scraped item files (`*.json`) under a path and loads them.

use crate::models::media::ScrapedItem;
use crate::utils::fs::{ensure_exists, is_json_file};
use crate::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect scraped item files under `path`, sorted by path.
///
/// A single file is returned as-is. Hidden directories are skipped.
pub fn find_items(path: &Path) -> Result<Vec<PathBuf>> {
    ensure_exists(path)?;

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut items: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Failed to access entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_json_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    items.sort();
    tracing::info!("Found {} scraped items under {}", items.len(), path.display());
    Ok(items)
}

/// Load one scraped item.
pub fn load_item(path: &Path) -> Result<ScrapedItem> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| crate::Error::InvalidItem(format!("{}: {}", path.display(), e)))
}
