//! Canonical film data models.

use crate::models::media::MediaType;
use crate::store::Value;

/// Core fields that are always present on a scraped film.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreFields {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub media_type: MediaType,
    pub trailer_id: Option<String>,
    pub quality: String,
    /// Player background image URL.
    pub player_background: String,
    pub poster_url: String,
}

/// Film attributes under canonical names, independent of upstream labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRecord {
    pub core: CoreFields,
    /// Rating text (`IMDB`).
    pub imdb: Option<String>,
    /// Duration text (`Duration`).
    pub duration: Option<String>,
    /// Comma-separated genres (`Genre`).
    pub genre: Option<String>,
    /// Comma-separated cast names (`Casts`).
    pub cast: Option<String>,
    /// Comma-separated production/director names (`Production`).
    pub director: Option<String>,
    /// Comma-separated countries (`Country`).
    pub country: Option<String>,
    /// Release date text (`Released`).
    pub year: Option<String>,
}

/// A film row exactly as it is written to the film table.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmRow {
    pub name: String,
    pub origin_name: String,
    pub thumb: String,
    pub cover_url: String,
    /// JSON array of genre identifiers.
    pub genres: String,
    pub year: i32,
    /// Country identifier; empty when no country resolved.
    pub country: String,
    pub view: i64,
    pub quality: String,
    pub duration: String,
    pub trailer_embed: String,
    /// JSON array of cast names.
    pub casts: String,
    /// JSON array of production names.
    pub production: String,
    pub hot: i64,
    pub vote_point: i64,
    pub vote_num: i64,
    pub imdb: f64,
    pub content: String,
    pub media_type: MediaType,
    pub public: i64,
    pub slug: String,
    pub time: String,
    pub creater: String,
}

impl FilmRow {
    /// Column/value pairs in insert order.
    pub fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", self.name.as_str().into()),
            ("origin_name", self.origin_name.as_str().into()),
            ("thumb", self.thumb.as_str().into()),
            ("coverUrl", self.cover_url.as_str().into()),
            ("genres", self.genres.as_str().into()),
            ("year", i64::from(self.year).into()),
            ("country", self.country.as_str().into()),
            ("view", self.view.into()),
            ("quality", self.quality.as_str().into()),
            ("duration", self.duration.as_str().into()),
            ("trailerEmbed", self.trailer_embed.as_str().into()),
            ("Casts", self.casts.as_str().into()),
            ("Production", self.production.as_str().into()),
            ("hot", self.hot.into()),
            ("votePoint", self.vote_point.into()),
            ("voteNum", self.vote_num.into()),
            ("imdb", self.imdb.into()),
            ("content", self.content.as_str().into()),
            ("type", self.media_type.as_str().into()),
            ("status", self.media_type.status().into()),
            ("public", self.public.into()),
            ("slug", self.slug.as_str().into()),
            ("time", self.time.as_str().into()),
            ("creater", self.creater.as_str().into()),
        ]
    }
}
