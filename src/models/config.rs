//! Configuration model.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ingestion behaviour.
    pub ingest: IngestConfig,
    /// Link templates.
    pub links: LinkConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Cover caching configuration.
    pub cover: CoverConfig,
    /// Directory for the error log sink.
    pub log_dir: PathBuf,
}

/// How genre names that also appear in the country list are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenreOverlap {
    /// Drop only the overlapping name from the genre list.
    #[default]
    RemoveName,
    /// Empty the whole genre list once any country name overlaps it.
    ClearList,
}

/// Ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Year used when the release date cannot be parsed.
    pub default_release_year: i32,
    /// Hours subtracted from the local clock for row timestamps.
    pub timezone_skew_hours: i64,
    /// Server name attached to every stream link.
    pub server_name: String,
    /// Genre/country overlap policy.
    pub genre_overlap: GenreOverlap,
    /// Log identifier used for film insert failures.
    pub error_log: String,
}

/// Link templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Base of the synthesized stream links (no trailing slash).
    pub stream_base: String,
    /// Prefix of trailer embed URLs; the trailer id is appended.
    pub trailer_base: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path.
    pub database: PathBuf,
    /// Table names.
    pub tables: TableNames,
}

/// Table names used by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub film: String,
    pub genre: String,
    pub country: String,
    pub episode: String,
}

impl TableNames {
    /// All tables, in the order they are cleared by `reset`.
    pub fn all(&self) -> [&str; 4] {
        [&self.episode, &self.film, &self.genre, &self.country]
    }
}

/// Cover caching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Whether covers are downloaded and served from our own domain.
    pub enabled: bool,
    /// Root directory; files land in `<save_path>/covers/`.
    pub save_path: PathBuf,
    /// Public domain prefixed to cached cover URLs.
    pub domain_name: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            default_release_year: 2022,
            timezone_skew_hours: 10,
            server_name: "2embed".to_string(),
            genre_overlap: GenreOverlap::default(),
            error_log: "insert_movie.log".to_string(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            stream_base: "https://www.2embed.to/embed/tmdb".to_string(),
            trailer_base: "https://www.youtube.com/embed/".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: dirs_config_path().join("media.db"),
            tables: TableNames::default(),
        }
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            film: "movie".to_string(),
            genre: "genres".to_string(),
            country: "country".to_string(),
            episode: "episode".to_string(),
        }
    }
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            save_path: dirs_config_path().join("public"),
            domain_name: "http://localhost".to_string(),
        }
    }
}

/// Get the configuration directory path.
pub fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("media_ingest")
}

/// Load configuration from the default location.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    if config_path.exists() {
        if let Ok(config) = load_config_from(&config_path) {
            return config;
        }
        tracing::warn!("Ignoring unreadable config: {}", config_path.display());
    }

    let mut config = Config::default();
    config.log_dir = dirs_config_path().join("logs");
    config
}

/// Load configuration from an explicit file.
pub fn load_config_from(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)
        .map_err(|e| crate::Error::InvalidConfig(format!("{}: {}", path.display(), e)))?;
    if config.log_dir.as_os_str().is_empty() {
        config.log_dir = dirs_config_path().join("logs");
    }
    Ok(config)
}
