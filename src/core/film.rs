//! Film upsert.
//!
//! A film is keyed on `(slug, type)`. The first ingestion normalizes and
//! inserts it; every later ingestion returns the stored id untouched.

use crate::core::slug::{resolve_many, slugify};
use crate::models::config::{Config, GenreOverlap};
use crate::models::film::{CanonicalRecord, CoreFields, FilmRow};
use crate::services::error_log::ErrorSink;
use crate::store::{Condition, Store};
use crate::utils::text::split_names;
use crate::Result;
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use std::collections::HashSet;

/// Outcome of a film upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmOutcome {
    /// The film was already stored.
    Existing(i64),
    /// The film was inserted by this call.
    Inserted(i64),
    /// Insertion failed and was logged; no identifier.
    Failed,
}

impl FilmOutcome {
    /// Film identifier, `None` for the no-identifier sentinel.
    pub fn id(&self) -> Option<i64> {
        match self {
            FilmOutcome::Existing(id) | FilmOutcome::Inserted(id) => Some(*id),
            FilmOutcome::Failed => None,
        }
    }
}

/// Genre, country and cast lists after cross-filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameLists {
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub cast: Vec<String>,
}

/// Split the raw lists and remove country names from genres and cast.
///
/// Names are compared by slug, the same key taxonomy rows are stored under.
pub fn partition_names(genre: &str, country: &str, cast: &str, policy: GenreOverlap) -> NameLists {
    let countries = split_names(country);
    let country_slugs: HashSet<String> = countries
        .iter()
        .map(|name| slugify(name))
        .filter(|slug| !slug.is_empty())
        .collect();
    let is_country = |name: &String| country_slugs.contains(&slugify(name));

    let all_genres = split_names(genre);
    let genres = match policy {
        GenreOverlap::RemoveName => all_genres
            .into_iter()
            .filter(|name| !is_country(name))
            .collect(),
        GenreOverlap::ClearList => {
            if all_genres.iter().any(is_country) {
                Vec::new()
            } else {
                all_genres
            }
        }
    };
    let cast = split_names(cast)
        .into_iter()
        .filter(|name| !is_country(name))
        .collect();

    NameLists {
        genres,
        countries,
        cast,
    }
}

/// Release year from a `YYYY-MM-DD` date, `default` when unparsable.
pub fn parse_year(released: Option<&str>, default: i32) -> i32 {
    released
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .map(|date| date.year())
        .unwrap_or(default)
}

/// Rating as a float, `0` when unparsable.
pub fn parse_rating(rating: Option<&str>) -> f64 {
    rating
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|r| r.is_finite())
        .unwrap_or(0.0)
}

/// Strip the minute unit and re-append a canonical one.
///
/// Returns an empty string when no numeric duration remains.
pub fn normalize_duration(duration: &str) -> String {
    let lower = duration.trim().to_lowercase();
    let number = ["mins", "min", "mn", "m"]
        .iter()
        .find_map(|unit| lower.strip_suffix(unit))
        .unwrap_or(lower.as_str())
        .trim();

    if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        format!("{} min", number)
    } else {
        String::new()
    }
}

/// Trailer embed URL, empty when there is no trailer id.
pub fn trailer_embed(base: &str, trailer_id: Option<&str>) -> String {
    match trailer_id.map(str::trim) {
        Some(id) if !id.is_empty() => format!("{}{}", base, id),
        _ => String::new(),
    }
}

/// Film upsert bound to a configuration and an error log.
pub struct FilmUpserter<'a> {
    config: &'a Config,
    errors: &'a dyn ErrorSink,
}

impl<'a> FilmUpserter<'a> {
    pub fn new(config: &'a Config, errors: &'a dyn ErrorSink) -> Self {
        Self { config, errors }
    }

    /// Return the stored film id, inserting the film first if needed.
    ///
    /// Lookup errors propagate. Anything failing on the insert path is
    /// recorded in the error log and reported as [`FilmOutcome::Failed`].
    pub fn upsert(&self, store: &mut dyn Store, record: &CanonicalRecord) -> Result<FilmOutcome> {
        self.upsert_at(store, record, chrono::Local::now().naive_local())
    }

    /// [`upsert`](Self::upsert) with an explicit clock.
    pub fn upsert_at(
        &self,
        store: &mut dyn Store,
        record: &CanonicalRecord,
        now: NaiveDateTime,
    ) -> Result<FilmOutcome> {
        if let Some(id) = self.find_existing(store, &record.core)? {
            tracing::debug!("Film already stored: {} (ID: {})", record.core.title, id);
            return Ok(FilmOutcome::Existing(id));
        }

        tracing::info!("Inserting root film: {}", record.core.title);
        let inserted = self
            .build_row(store, record, now)
            .and_then(|row| store.insert(&self.config.storage.tables.film, &row.columns()));

        match inserted {
            Ok(id) => Ok(FilmOutcome::Inserted(id)),
            Err(e) => {
                self.errors.record(
                    &format!("Failed to insert film: {}\n{}", record.core.title, e),
                    &self.config.ingest.error_log,
                );
                Ok(FilmOutcome::Failed)
            }
        }
    }

    /// Id of the film stored under `(slug, type)`, if any.
    pub fn find_existing(&self, store: &mut dyn Store, core: &CoreFields) -> Result<Option<i64>> {
        let table = &self.config.storage.tables.film;
        let condition =
            Condition::eq("slug", film_slug(core).as_str()).and("type", core.media_type.as_str());

        match store.select_all(table, &condition)?.first() {
            Some(row) => row.id().map(Some).ok_or_else(|| crate::Error::MissingColumn {
                table: table.clone(),
                column: "id".to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Assemble the row to insert, resolving genres and countries.
    pub fn build_row(
        &self,
        store: &mut dyn Store,
        record: &CanonicalRecord,
        now: NaiveDateTime,
    ) -> Result<FilmRow> {
        let core = &record.core;
        let ingest = &self.config.ingest;
        let tables = &self.config.storage.tables;

        let slug = film_slug(core);
        if slug.is_empty() {
            return Err(crate::Error::InvalidItem(format!(
                "film '{}' has no usable slug",
                core.title
            )));
        }

        let lists = partition_names(
            record.genre.as_deref().unwrap_or_default(),
            record.country.as_deref().unwrap_or_default(),
            record.cast.as_deref().unwrap_or_default(),
            ingest.genre_overlap,
        );
        let genres: Vec<String> = resolve_many(store, &tables.genre, &lists.genres)
            .into_iter()
            .map(|taxon| taxon.slug)
            .collect();
        let country = resolve_many(store, &tables.country, &lists.countries)
            .into_iter()
            .next()
            .map(|taxon| taxon.slug)
            .unwrap_or_default();
        let production = split_names(record.director.as_deref().unwrap_or_default());

        let stamp = TimeDelta::try_hours(ingest.timezone_skew_hours)
            .and_then(|skew| now.checked_sub_signed(skew))
            .ok_or_else(|| {
                crate::Error::InvalidConfig(format!(
                    "ingest.timezone_skew_hours out of range: {}",
                    ingest.timezone_skew_hours
                ))
            })?;
        let quality = if core.quality.trim().is_empty() {
            "HD".to_string()
        } else {
            core.quality.clone()
        };

        Ok(FilmRow {
            name: core.title.clone(),
            origin_name: core.title.clone(),
            thumb: core.poster_url.clone(),
            cover_url: core.player_background.clone(),
            genres: serde_json::to_string(&genres)?,
            year: parse_year(record.year.as_deref(), ingest.default_release_year),
            country,
            view: 0,
            quality,
            duration: normalize_duration(record.duration.as_deref().unwrap_or_default()),
            trailer_embed: trailer_embed(
                &self.config.links.trailer_base,
                core.trailer_id.as_deref(),
            ),
            casts: serde_json::to_string(&lists.cast)?,
            production: serde_json::to_string(&production)?,
            hot: 0,
            vote_point: 0,
            vote_num: 0,
            imdb: parse_rating(record.imdb.as_deref()),
            content: core.description.clone(),
            media_type: core.media_type,
            public: 1,
            slug,
            time: stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            creater: stamp.format("%Y-%m-%d").to_string(),
        })
    }
}

/// Stored slug, derived from the title when the scraper gave none.
fn film_slug(core: &CoreFields) -> String {
    if core.slug.trim().is_empty() {
        slugify(&core.title)
    } else {
        core.slug.trim().to_string()
    }
}
