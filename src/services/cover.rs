//! Cover image cache.
//!
//! Downloads covers once into `<save_path>/covers/` and hands out public
//! URLs on the configured domain.

use crate::models::config::CoverConfig;
use crate::Result;
use std::path::{Path, PathBuf};

/// Cached cover filename for a film: `<slug>.<ext>`.
///
/// Returns `None` when the source URL has no file extension.
pub fn cover_filename(slug: &str, cover_src: &str) -> Option<String> {
    let path = cover_src.split(['?', '#']).next().unwrap_or_default();
    let last = path.rsplit('/').next().unwrap_or_default();
    let (stem, ext) = last.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(format!("{}.{}", slug, ext.to_lowercase()))
}

/// Cover cache client.
pub struct CoverCache {
    config: CoverConfig,
    client: reqwest::Client,
}

impl CoverCache {
    pub fn new(config: CoverConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Local path of a cached cover.
    pub fn local_path(&self, filename: &str) -> PathBuf {
        self.config.save_path.join("covers").join(filename)
    }

    /// Public URL of a cached cover.
    pub fn public_url(&self, filename: &str) -> String {
        format!(
            "{}/covers/{}",
            self.config.domain_name.trim_end_matches('/'),
            filename
        )
    }

    /// Make sure `src` is cached as `filename` and return its public URL.
    pub async fn cache(&self, src: &str, filename: &str) -> Result<String> {
        let path = self.local_path(filename);

        // Skip if file already exists
        if path.exists() {
            tracing::debug!("Cover already cached, skipping: {:?}", path);
            return Ok(self.public_url(filename));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let response = self.client.get(src).send().await?;
        if !response.status().is_success() {
            return Err(crate::Error::CoverDownload(format!(
                "{} returned status {}",
                src,
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        write_atomically(&path, &bytes).await?;
        tracing::debug!("Downloaded cover: {:?}", path);

        Ok(self.public_url(filename))
    }
}

/// Write `bytes` to a sibling `.part` file, then rename it over `path`.
///
/// An interrupted download never leaves a file at `path`.
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    if let Err(e) = tokio::fs::write(&partial, bytes).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e.into());
    }
    tokio::fs::rename(&partial, path).await?;
    Ok(())
}
