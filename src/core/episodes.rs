//! Episode/season document assembly.
//!
//! Turns the raw episode tree into the canonical season list. Titles are
//! normalized, every link is protocol-qualified and episodes without links
//! are dropped.

use crate::models::config::Config;
use crate::models::episode::{Episode, Season, Server};
use crate::models::media::{MediaType, RawEpisode, RawEpisodes};
use crate::utils::text::{https_link, normalize_title};
use indexmap::IndexMap;

/// Server type attached to every stream entry.
pub const SERVER_TYPE: &str = "embed";

/// Extract the season index from a label like `"Season 2"`.
///
/// Defaults to `"1"` when the label carries no index.
pub fn season_number(label: &str) -> String {
    let folded = label.replace('\n', " ").to_lowercase();
    if let Ok(re) = regex::Regex::new(r"season\s+(\d+)") {
        if let Some(caps) = re.captures(&folded) {
            return caps[1].to_string();
        }
    }
    "1".to_string()
}

/// Sort key for an episode number; non-numeric keys sort last.
fn episode_key(number: &str) -> f64 {
    number.trim().parse::<f64>().unwrap_or(f64::INFINITY)
}

/// Whether any episode in the season carries its own links.
fn has_explicit_links(episodes: &IndexMap<String, RawEpisode>) -> bool {
    episodes
        .values()
        .any(|episode| matches!(episode, RawEpisode::Linked { .. }))
}

/// Builds season documents from raw episode trees.
pub struct EpisodeAssembler<'a> {
    config: &'a Config,
}

impl<'a> EpisodeAssembler<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Assemble the canonical season list for a film.
    pub fn assemble(&self, raw: &RawEpisodes, media_type: MediaType) -> Vec<Season> {
        let external_id = raw
            .tmdb_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "0".to_string());

        match media_type {
            MediaType::Movie => vec![self.movie_season(raw, &external_id)],
            MediaType::TvShows => raw
                .seasons()
                .map(|(label, episodes)| {
                    let number = season_number(label);
                    let season_episode = if has_explicit_links(episodes) {
                        self.validate_linked(episodes)
                    } else {
                        self.synthesize(episodes, &external_id, &number)
                    };
                    Season {
                        season_name: label.to_string(),
                        season_number: number,
                        season_episode,
                    }
                })
                .collect(),
        }
    }

    /// The single implicit season of a movie.
    ///
    /// Explicit links from the source win over the synthesized link.
    fn movie_season(&self, raw: &RawEpisodes, external_id: &str) -> Season {
        let linked = raw
            .seasons()
            .find(|(_, episodes)| has_explicit_links(episodes))
            .map(|(_, episodes)| self.validate_linked(episodes))
            .filter(|episodes| !episodes.is_empty());

        let season_episode = linked.unwrap_or_else(|| {
            vec![Episode {
                episode_name: "Episode 1".to_string(),
                episode_server: self.servers(vec![self.movie_link(external_id)]),
            }]
        });

        Season {
            season_name: "Season 1".to_string(),
            season_number: "1".to_string(),
            season_episode,
        }
    }

    /// One synthesized stream link per episode, in source order.
    fn synthesize(
        &self,
        episodes: &IndexMap<String, RawEpisode>,
        external_id: &str,
        season: &str,
    ) -> Vec<Episode> {
        episodes
            .iter()
            .map(|(number, episode)| Episode {
                episode_name: normalize_title(episode.title()),
                episode_server: self.servers(vec![self.series_link(external_id, season, number)]),
            })
            .filter(|episode| !episode.episode_server.is_empty())
            .collect()
    }

    /// Validation pass for sources that carry explicit links.
    ///
    /// Links are protocol-qualified, episodes without links are dropped and
    /// the rest are sorted by numeric episode key.
    pub fn validate_linked(&self, episodes: &IndexMap<String, RawEpisode>) -> Vec<Episode> {
        let mut entries: Vec<(f64, Episode)> = episodes
            .iter()
            .filter_map(|(number, episode)| {
                let links: Vec<String> = match episode {
                    RawEpisode::Linked { links, .. } => links
                        .iter()
                        .map(|link| https_link(link))
                        .filter(|link| !link.is_empty())
                        .collect(),
                    RawEpisode::Title(_) => Vec::new(),
                };
                if links.is_empty() {
                    tracing::debug!("Dropping episode {} without links", number);
                    return None;
                }
                Some((
                    episode_key(number),
                    Episode {
                        episode_name: normalize_title(episode.title()),
                        episode_server: self.servers(links),
                    },
                ))
            })
            .collect();

        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        entries.into_iter().map(|(_, episode)| episode).collect()
    }

    fn servers(&self, links: Vec<String>) -> Vec<Server> {
        links
            .into_iter()
            .map(|link| Server {
                server_name: self.config.ingest.server_name.clone(),
                server_type: SERVER_TYPE.to_string(),
                server_link: link,
            })
            .collect()
    }

    fn series_link(&self, external_id: &str, season: &str, episode: &str) -> String {
        format!(
            "{}/tv?id={}&s={}&e={}",
            self.config.links.stream_base,
            external_id,
            season,
            episode.trim()
        )
    }

    fn movie_link(&self, external_id: &str) -> String {
        format!("{}/movie?id={}", self.config.links.stream_base, external_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_number() {
        assert_eq!(season_number("Season 2"), "2");
        assert_eq!(season_number("SEASON   12"), "12");
        assert_eq!(season_number("The Show\nSeason 3"), "3");
        assert_eq!(season_number("Specials"), "1");
        assert_eq!(season_number("Season"), "1");
    }

    #[test]
    fn test_episode_key_ordering() {
        assert!(episode_key("2") < episode_key("10"));
        assert!(episode_key("1.5") < episode_key("2"));
        assert_eq!(episode_key("special"), f64::INFINITY);
    }
}
