//! Per-item ingestion pipeline.
//!
//! cover cache -> normalize -> film upsert -> assemble episodes -> diff write.
//! Items are processed one at a time, each to completion.

use crate::core::episodes::EpisodeAssembler;
use crate::core::film::{FilmOutcome, FilmUpserter};
use crate::core::normalizer::normalize;
use crate::core::slug::slugify;
use crate::core::writer::{EpisodeWriter, WriteOutcome};
use crate::models::config::Config;
use crate::models::film::CoreFields;
use crate::models::media::{ScrapedFilm, ScrapedItem};
use crate::services::cover::{cover_filename, CoverCache};
use crate::services::error_log::ErrorSink;
use crate::store::Store;
use crate::Result;

/// What happened to one scraped item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub title: String,
    pub film: FilmOutcome,
    /// `None` when the film has no identifier.
    pub episodes: Option<WriteOutcome>,
}

/// Core fields of a scraped film, with defaults applied.
pub fn core_fields(film: &ScrapedFilm) -> CoreFields {
    let title = film.title.trim().to_string();
    let slug = if film.slug.trim().is_empty() {
        slugify(&title)
    } else {
        film.slug.trim().to_string()
    };

    CoreFields {
        title,
        slug,
        description: film.description.clone(),
        media_type: film.media_type(),
        trailer_id: film.trailer_id.clone(),
        quality: film.quality(),
        player_background: film.cover_src.clone(),
        poster_url: film.cover_src.clone(),
    }
}

/// Ingestion pipeline bound to a configuration.
pub struct Ingestor<'a> {
    config: &'a Config,
    errors: &'a dyn ErrorSink,
    covers: Option<&'a CoverCache>,
}

impl<'a> Ingestor<'a> {
    pub fn new(config: &'a Config, errors: &'a dyn ErrorSink) -> Self {
        Self {
            config,
            errors,
            covers: None,
        }
    }

    /// Cache covers before ingesting.
    pub fn with_covers(mut self, covers: &'a CoverCache) -> Self {
        self.covers = Some(covers);
        self
    }

    /// Ingest one scraped item.
    pub async fn ingest(&self, store: &mut dyn Store, mut item: ScrapedItem) -> Result<IngestReport> {
        if let Some(covers) = self.covers {
            cache_cover(covers, &mut item.film).await;
        }
        self.ingest_prepared(store, &item)
    }

    /// Ingest an item whose cover URL is final.
    pub fn ingest_prepared(&self, store: &mut dyn Store, item: &ScrapedItem) -> Result<IngestReport> {
        let core = core_fields(&item.film);
        let title = core.title.clone();
        let media_type = core.media_type;

        let record = normalize(&item.film.extra_fields(), core);
        let film = FilmUpserter::new(self.config, self.errors).upsert(store, &record)?;

        let Some(film_id) = film.id() else {
            return Ok(IngestReport {
                title,
                film,
                episodes: None,
            });
        };

        tracing::info!("Updating episodes for film {} with ID: {}", title, film_id);
        let seasons = EpisodeAssembler::new(self.config).assemble(&item.episodes, media_type);
        let outcome = EpisodeWriter::new(&self.config.storage.tables)
            .write_if_changed(store, film_id, &seasons)?;
        if outcome == WriteOutcome::Updated {
            tracing::info!("Episodes changed for film {}", title);
        }

        Ok(IngestReport {
            title,
            film,
            episodes: Some(outcome),
        })
    }
}

/// Replace the cover URL with its cached public URL.
///
/// A failed download keeps the upstream URL.
async fn cache_cover(covers: &CoverCache, film: &mut ScrapedFilm) {
    let slug = core_fields(film).slug;
    let Some(filename) = cover_filename(&slug, &film.cover_src) else {
        return;
    };

    match covers.cache(&film.cover_src, &filename).await {
        Ok(url) => film.cover_src = url,
        Err(e) => tracing::warn!("Cover download failed for {}: {}", film.title, e),
    }
}
