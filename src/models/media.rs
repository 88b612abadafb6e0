//! Scraped media data models.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Media type enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    #[default]
    TvShows,
}

impl MediaType {
    /// Tag stored in the film `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::TvShows => "tvshows",
        }
    }

    /// Publication status derived from the media type.
    pub fn status(&self) -> &'static str {
        match self {
            MediaType::Movie => "completed",
            MediaType::TvShows => "ongoing",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scraped item: a film plus its episode listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedItem {
    pub film: ScrapedFilm,
    #[serde(default)]
    pub episodes: RawEpisodes,
}

/// Film fields as produced by the scraper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapedFilm {
    /// Display title.
    pub title: String,
    /// Slug; derived from the title when empty.
    #[serde(default)]
    pub slug: String,
    /// Synopsis.
    #[serde(default)]
    pub description: String,
    /// Media type; series when absent.
    #[serde(default)]
    pub post_type: Option<MediaType>,
    /// Trailer platform identifier.
    #[serde(default)]
    pub trailer_id: Option<String>,
    /// Cover image URL.
    #[serde(default)]
    pub cover_src: String,
    /// Loosely structured label -> value dictionary.
    #[serde(default)]
    pub extra_info: IndexMap<String, serde_json::Value>,
}

impl ScrapedFilm {
    /// Media type with the series default applied.
    pub fn media_type(&self) -> MediaType {
        self.post_type.unwrap_or_default()
    }

    /// Quality label, `HD` when the scraper did not report one.
    pub fn quality(&self) -> String {
        self.extra_fields()
            .get("quality")
            .filter(|q| !q.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| "HD".to_string())
    }

    /// `extra_info` with every value flattened to text.
    ///
    /// Arrays are joined with commas so list-valued labels such as
    /// `Genre` split the same way as their string form.
    pub fn extra_fields(&self) -> IndexMap<String, String> {
        self.extra_info
            .iter()
            .filter_map(|(label, value)| {
                let text = match value {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Array(items) => items
                        .iter()
                        .map(|item| match item {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(","),
                    other => other.to_string(),
                };
                Some((label.clone(), text))
            })
            .collect()
    }
}

/// External numeric identifier used by the stream link templates.
///
/// Any JSON scalar is accepted; values that are not a whole non-negative
/// number are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum ExternalId {
    Number(u64),
    Text(String),
}

impl From<serde_json::Value> for ExternalId {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(id) => ExternalId::Number(id),
                None => match n.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => {
                        ExternalId::Number(f as u64)
                    }
                    _ => ExternalId::Text(n.to_string()),
                },
            },
            serde_json::Value::String(s) => ExternalId::Text(s),
            other => ExternalId::Text(other.to_string()),
        }
    }
}

impl std::fmt::Display for ExternalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExternalId::Number(n) => write!(f, "{}", n),
            ExternalId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Raw episode tree: `tmdb_id` plus season label -> episode mapping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEpisodes {
    #[serde(default)]
    pub tmdb_id: Option<ExternalId>,
    /// Every other key, in source order.
    #[serde(flatten)]
    pub entries: IndexMap<String, RawEntry>,
}

/// A top-level value of the raw episode tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    /// Episode number -> episode.
    Season(IndexMap<String, RawEpisode>),
    /// Anything else the scraper left in the tree.
    Other(serde_json::Value),
}

/// A single raw episode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawEpisode {
    /// Title only; links are synthesized.
    Title(String),
    /// Title with explicit stream links.
    Linked {
        title: String,
        #[serde(default)]
        links: Vec<String>,
    },
}

impl RawEpisode {
    pub fn title(&self) -> &str {
        match self {
            RawEpisode::Title(title) => title,
            RawEpisode::Linked { title, .. } => title,
        }
    }
}

impl RawEpisodes {
    /// Create an empty tree with an optional external id.
    pub fn new(tmdb_id: Option<ExternalId>) -> Self {
        Self {
            tmdb_id,
            entries: IndexMap::new(),
        }
    }

    /// Append a season of title-only episodes.
    pub fn with_season(mut self, label: &str, episodes: &[(&str, &str)]) -> Self {
        let season = episodes
            .iter()
            .map(|(number, title)| (number.to_string(), RawEpisode::Title(title.to_string())))
            .collect();
        self.entries.insert(label.to_string(), RawEntry::Season(season));
        self
    }

    /// Iterate the entries that look like seasons.
    pub fn seasons(&self) -> impl Iterator<Item = (&str, &IndexMap<String, RawEpisode>)> {
        self.entries.iter().filter_map(|(label, entry)| match entry {
            RawEntry::Season(episodes) if label.to_lowercase().contains("season") => {
                Some((label.as_str(), episodes))
            }
            _ => None,
        })
    }
}
