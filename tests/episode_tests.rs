//! Integration tests for episode assembly and change-detecting writes.
//!
//! Tests cover:
//! - Movie synthesis and series season parsing
//! - Explicit-link validation (protocol, ordering, dropping)
//! - No-op writes and wholesale replacement
//! - Blob-encoded stored documents

use indexmap::IndexMap;
use media_ingest::core::episodes::EpisodeAssembler;
use media_ingest::core::writer::{serialize_seasons, EpisodeWriter, WriteOutcome};
use media_ingest::models::config::{Config, TableNames};
use media_ingest::models::episode::Season;
use media_ingest::models::media::{ExternalId, MediaType, RawEntry, RawEpisode, RawEpisodes};
use media_ingest::store::{Condition, MemoryStore, Row, SqliteStore, Store, Value};
use media_ingest::Result;

// ========== TEST FIXTURES ==========

fn linked(title: &str, links: &[&str]) -> RawEpisode {
    RawEpisode::Linked {
        title: title.to_string(),
        links: links.iter().map(|l| l.to_string()).collect(),
    }
}

fn series_tree() -> RawEpisodes {
    RawEpisodes::new(Some(ExternalId::Number(1396)))
        .with_season("Season 1", &[("1", "Pilot"), ("2", "Cat's in the Bag...")])
        .with_season("Season 2", &[("1", "Seven Thirty-Seven")])
}

fn stored_data(store: &MemoryStore, film_id: i64) -> String {
    store
        .rows("episode")
        .iter()
        .find(|row| row.get("movieId") == Some(&Value::Integer(film_id)))
        .unwrap()
        .text("episode", "data")
        .unwrap()
}

/// Memory store that hands stored text back as bytes.
struct BlobStore {
    inner: MemoryStore,
}

impl Store for BlobStore {
    fn select_all(&mut self, table: &str, condition: &Condition) -> Result<Vec<Row>> {
        let rows = self.inner.select_all(table, condition)?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let data = row.text(table, "data").unwrap_or_default();
                Row::new(vec![
                    ("id".to_string(), row.get("id").cloned().unwrap_or(Value::Null)),
                    ("data".to_string(), Value::Blob(data.into_bytes())),
                ])
            })
            .collect())
    }

    fn insert(&mut self, table: &str, data: &[(&str, Value)]) -> Result<i64> {
        self.inner.insert(table, data)
    }

    fn update(&mut self, table: &str, set: &[(&str, Value)], condition: &Condition) -> Result<()> {
        self.inner.update(table, set, condition)
    }

    fn delete_from(&mut self, table: &str) -> Result<()> {
        self.inner.delete_from(table)
    }
}

// ========== ASSEMBLY TESTS ==========

#[test]
fn test_movie_synthesizes_single_episode() {
    let config = Config::default();
    let assembler = EpisodeAssembler::new(&config);

    let seasons = assembler.assemble(
        &RawEpisodes::new(Some(ExternalId::Text("603".to_string()))),
        MediaType::Movie,
    );

    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].season_name, "Season 1");
    assert_eq!(seasons[0].season_number, "1");
    assert_eq!(seasons[0].season_episode.len(), 1);

    let episode = &seasons[0].season_episode[0];
    assert_eq!(episode.episode_name, "Episode 1");
    assert_eq!(episode.episode_server.len(), 1);
    assert_eq!(
        episode.episode_server[0].server_link,
        "https://www.2embed.to/embed/tmdb/movie?id=603"
    );
    assert_eq!(episode.episode_server[0].server_type, "embed");
    assert_eq!(episode.episode_server[0].server_name, config.ingest.server_name);
}

#[test]
fn test_movie_ignores_title_only_seasons() {
    let config = Config::default();
    let assembler = EpisodeAssembler::new(&config);

    let seasons = assembler.assemble(&series_tree(), MediaType::Movie);

    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].season_episode.len(), 1);
    assert_eq!(
        seasons[0].season_episode[0].episode_server[0].server_link,
        "https://www.2embed.to/embed/tmdb/movie?id=1396"
    );
}

#[test]
fn test_series_seasons_and_links() {
    let config = Config::default();
    let assembler = EpisodeAssembler::new(&config);

    let seasons = assembler.assemble(&series_tree(), MediaType::TvShows);

    assert_eq!(seasons.len(), 2);
    assert_eq!(seasons[0].season_name, "Season 1");
    assert_eq!(seasons[0].season_number, "1");
    assert_eq!(seasons[1].season_number, "2");

    let names: Vec<&str> = seasons[0]
        .season_episode
        .iter()
        .map(|e| e.episode_name.as_str())
        .collect();
    assert_eq!(names, vec!["Pilot", "Cat's in the Bag..."]);
    assert_eq!(
        seasons[1].season_episode[0].episode_server[0].server_link,
        "https://www.2embed.to/embed/tmdb/tv?id=1396&s=2&e=1"
    );
}

#[test]
fn test_series_keeps_source_order_and_skips_other_keys() {
    let config = Config::default();
    let assembler = EpisodeAssembler::new(&config);

    let mut raw = RawEpisodes::new(None)
        .with_season("Specials", &[("1", "Behind the Scenes")])
        .with_season("Season 3", &[("10", "Ten"), ("2", "Two")]);
    raw.entries.insert(
        "Season notes".to_string(),
        RawEntry::Other(serde_json::json!("not a season")),
    );

    let seasons = assembler.assemble(&raw, MediaType::TvShows);

    // "Specials" carries no "season" token.
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].season_number, "3");
    let names: Vec<&str> = seasons[0]
        .season_episode
        .iter()
        .map(|e| e.episode_name.as_str())
        .collect();
    assert_eq!(names, vec!["Ten", "Two"]);
    assert_eq!(
        seasons[0].season_episode[0].episode_server[0].server_link,
        "https://www.2embed.to/embed/tmdb/tv?id=0&s=3&e=10"
    );
}

#[test]
fn test_unnumbered_season_label_defaults_to_one() {
    let config = Config::default();
    let assembler = EpisodeAssembler::new(&config);

    let raw = RawEpisodes::new(Some(ExternalId::Number(7))).with_season("Season Finale", &[("1", "End")]);
    let seasons = assembler.assemble(&raw, MediaType::TvShows);

    assert_eq!(seasons[0].season_number, "1");
    assert_eq!(
        seasons[0].season_episode[0].episode_server[0].server_link,
        "https://www.2embed.to/embed/tmdb/tv?id=7&s=1&e=1"
    );
}

#[test]
fn test_titles_are_normalized() {
    let config = Config::default();
    let assembler = EpisodeAssembler::new(&config);

    let raw = RawEpisodes::new(None).with_season("Season 1", &[("1", "  The\nPilot\t(Part 1)\r ")]);
    let seasons = assembler.assemble(&raw, MediaType::TvShows);

    assert_eq!(seasons[0].season_episode[0].episode_name, "ThePilot (Part 1)");
}

#[test]
fn test_explicit_links_are_validated() {
    let config = Config::default();
    let assembler = EpisodeAssembler::new(&config);

    let mut episodes = IndexMap::new();
    episodes.insert("10".to_string(), linked("Ten", &["//cdn.example/10"]));
    episodes.insert("2".to_string(), linked("Two", &["https://cdn.example/2", "//mirror.example/2"]));
    episodes.insert("3".to_string(), linked("Three", &[]));
    episodes.insert("1".to_string(), RawEpisode::Title("One".to_string()));

    let mut raw = RawEpisodes::new(None);
    raw.entries.insert("Season 1".to_string(), RawEntry::Season(episodes));

    let seasons = assembler.assemble(&raw, MediaType::TvShows);
    let season = &seasons[0];

    let names: Vec<&str> = season
        .season_episode
        .iter()
        .map(|e| e.episode_name.as_str())
        .collect();
    assert_eq!(names, vec!["Two", "Ten"]);

    let links: Vec<&str> = season.season_episode[0]
        .episode_server
        .iter()
        .map(|s| s.server_link.as_str())
        .collect();
    assert_eq!(links, vec!["https://cdn.example/2", "https://mirror.example/2"]);
    assert_eq!(
        season.season_episode[1].episode_server[0].server_link,
        "https://cdn.example/10"
    );
}

#[test]
fn test_movie_with_explicit_links() {
    let config = Config::default();
    let assembler = EpisodeAssembler::new(&config);

    let mut episodes = IndexMap::new();
    episodes.insert("1".to_string(), linked("Full Movie", &["//cdn.example/movie"]));
    let mut raw = RawEpisodes::new(None);
    raw.entries.insert("Season 1".to_string(), RawEntry::Season(episodes));

    let seasons = assembler.assemble(&raw, MediaType::Movie);

    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].season_episode[0].episode_name, "Full Movie");
    assert_eq!(
        seasons[0].season_episode[0].episode_server[0].server_link,
        "https://cdn.example/movie"
    );
}

// ========== WRITER TESTS ==========

#[test]
fn test_identical_documents_write_once() {
    let config = Config::default();
    let seasons = EpisodeAssembler::new(&config).assemble(&series_tree(), MediaType::TvShows);
    let writer = EpisodeWriter::new(&config.storage.tables);
    let mut store = MemoryStore::new();

    let first = writer.write_if_changed(&mut store, 1, &seasons).unwrap();
    let second = writer.write_if_changed(&mut store, 1, &seasons).unwrap();

    assert_eq!(first, WriteOutcome::Created);
    assert_eq!(second, WriteOutcome::Unchanged);
    assert_eq!(store.writes(), 1);
    assert_eq!(store.rows("episode").len(), 1);
}

#[test]
fn test_changed_document_is_replaced() {
    let config = Config::default();
    let assembler = EpisodeAssembler::new(&config);
    let writer = EpisodeWriter::new(&config.storage.tables);
    let mut store = MemoryStore::new();

    let original = assembler.assemble(&series_tree(), MediaType::TvShows);
    writer.write_if_changed(&mut store, 1, &original).unwrap();
    writer.write_if_changed(&mut store, 1, &original).unwrap();
    let before = stored_data(&store, 1);

    let renamed = RawEpisodes::new(Some(ExternalId::Number(1396)))
        .with_season("Season 1", &[("1", "Pilot (Extended)"), ("2", "Cat's in the Bag...")])
        .with_season("Season 2", &[("1", "Seven Thirty-Seven")]);
    let changed = assembler.assemble(&renamed, MediaType::TvShows);
    let outcome = writer.write_if_changed(&mut store, 1, &changed).unwrap();

    assert_eq!(outcome, WriteOutcome::Updated);
    assert_eq!(store.writes(), 2);
    let after = stored_data(&store, 1);
    assert_ne!(before, after);
    assert_eq!(after, serialize_seasons(&changed).unwrap());
    assert_eq!(store.rows("episode").len(), 1);
}

#[test]
fn test_documents_are_per_film() {
    let config = Config::default();
    let seasons = EpisodeAssembler::new(&config).assemble(&series_tree(), MediaType::TvShows);
    let writer = EpisodeWriter::new(&config.storage.tables);
    let mut store = MemoryStore::new();

    writer.write_if_changed(&mut store, 1, &seasons).unwrap();
    writer.write_if_changed(&mut store, 2, &[]).unwrap();

    assert_eq!(store.rows("episode").len(), 2);
    assert_eq!(stored_data(&store, 2), "[]");
}

#[test]
fn test_blob_stored_document_is_decoded() {
    let config = Config::default();
    let seasons = EpisodeAssembler::new(&config).assemble(&series_tree(), MediaType::TvShows);
    let writer = EpisodeWriter::new(&config.storage.tables);
    let mut store = BlobStore {
        inner: MemoryStore::new(),
    };

    writer.write_if_changed(&mut store, 1, &seasons).unwrap();
    let outcome = writer.write_if_changed(&mut store, 1, &seasons).unwrap();

    assert_eq!(outcome, WriteOutcome::Unchanged);
    assert_eq!(store.inner.writes(), 1);
}

#[test]
fn test_quotes_survive_sqlite_round_trip() {
    let config = Config::default();
    let seasons = EpisodeAssembler::new(&config).assemble(&series_tree(), MediaType::TvShows);
    let writer = EpisodeWriter::new(&config.storage.tables);
    let mut store = SqliteStore::open_in_memory(&TableNames::default()).unwrap();

    assert_eq!(writer.write_if_changed(&mut store, 9, &[]).unwrap(), WriteOutcome::Created);
    assert_eq!(writer.write_if_changed(&mut store, 9, &seasons).unwrap(), WriteOutcome::Updated);
    assert_eq!(writer.write_if_changed(&mut store, 9, &seasons).unwrap(), WriteOutcome::Unchanged);

    let rows = store
        .select_all("episode", &Condition::eq("movieId", 9i64))
        .unwrap();
    let stored: Vec<Season> = serde_json::from_str(&rows[0].text("episode", "data").unwrap()).unwrap();
    assert_eq!(stored, seasons);
    assert_eq!(stored[0].season_episode[1].episode_name, "Cat's in the Bag...");
}
