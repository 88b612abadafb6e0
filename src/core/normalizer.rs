//! Scraped field normalization.

use crate::models::film::{CanonicalRecord, CoreFields};
use indexmap::IndexMap;

/// Canonical keys fed from upstream labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalKey {
    Imdb,
    Duration,
    Genre,
    Cast,
    Director,
    Country,
    Year,
}

/// Map an upstream label onto its canonical key.
///
/// Labels outside this closed set are dropped by [`normalize`].
pub fn canonical_key(label: &str) -> Option<CanonicalKey> {
    match label {
        "IMDB" => Some(CanonicalKey::Imdb),
        "Duration" => Some(CanonicalKey::Duration),
        "Genre" => Some(CanonicalKey::Genre),
        "Casts" => Some(CanonicalKey::Cast),
        "Production" => Some(CanonicalKey::Director),
        "Country" => Some(CanonicalKey::Country),
        "Released" => Some(CanonicalKey::Year),
        _ => None,
    }
}

/// Build the canonical record for a film.
pub fn normalize(raw_fields: &IndexMap<String, String>, core: CoreFields) -> CanonicalRecord {
    let mut record = CanonicalRecord {
        core,
        ..Default::default()
    };

    for (label, value) in raw_fields {
        let Some(key) = canonical_key(label) else {
            continue;
        };
        let slot = match key {
            CanonicalKey::Imdb => &mut record.imdb,
            CanonicalKey::Duration => &mut record.duration,
            CanonicalKey::Genre => &mut record.genre,
            CanonicalKey::Cast => &mut record.cast,
            CanonicalKey::Director => &mut record.director,
            CanonicalKey::Country => &mut record.country,
            CanonicalKey::Year => &mut record.year,
        };
        *slot = Some(value.clone());
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_known_labels_are_renamed() {
        let record = normalize(
            &fields(&[
                ("Genre", "Drama"),
                ("Casts", "Louis Hofmann"),
                ("Production", "Baran bo Odar"),
                ("Country", "Germany"),
                ("Released", "2017-12-01"),
                ("Duration", "60m"),
                ("IMDB", "8.7"),
            ]),
            CoreFields::default(),
        );

        assert_eq!(record.genre.as_deref(), Some("Drama"));
        assert_eq!(record.cast.as_deref(), Some("Louis Hofmann"));
        assert_eq!(record.director.as_deref(), Some("Baran bo Odar"));
        assert_eq!(record.country.as_deref(), Some("Germany"));
        assert_eq!(record.year.as_deref(), Some("2017-12-01"));
        assert_eq!(record.duration.as_deref(), Some("60m"));
        assert_eq!(record.imdb.as_deref(), Some("8.7"));
    }

    #[test]
    fn test_unknown_and_missing_labels() {
        let core = CoreFields {
            title: "Dark".to_string(),
            ..Default::default()
        };
        let record = normalize(&fields(&[("Tagline", "x"), ("genre", "lowercase")]), core);

        assert_eq!(record.core.title, "Dark");
        assert_eq!(record.genre, None);
        assert_eq!(record.country, None);
        assert_eq!(record.year, None);
    }
}
