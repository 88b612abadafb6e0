//! Taxonomy slug resolution.
//!
//! Maps free-text names (genres, countries) onto rows of a taxonomy table,
//! creating the row on first sight. The slug is the dedup key.

use crate::store::{Condition, Store, Value};
use crate::Result;

/// A resolved taxonomy row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxon {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Outcome of resolving one name in a batch.
#[derive(Debug)]
pub enum Resolution {
    Resolved(Taxon),
    Skipped { name: String, reason: crate::Error },
}

/// Normalize a display name into a slug.
///
/// Lowercases, transliterates to ASCII and joins tokens with hyphens,
/// e.g. `"Hành Động"` becomes `"hanh-dong"`.
pub fn slugify(name: &str) -> String {
    slug::slugify(name.trim())
}

/// Find or create the row for `name` in `table`.
pub fn resolve(store: &mut dyn Store, table: &str, name: &str) -> Result<Taxon> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(crate::Error::EmptyName(table.to_string()));
    }

    let selected = store.select_or_insert(
        table,
        &Condition::eq("slug", slug.as_str()),
        &[("name", Value::from(name.trim())), ("slug", Value::from(slug.as_str()))],
    )?;
    let row = selected
        .rows
        .first()
        .ok_or_else(|| crate::Error::other(format!("{} row for '{}' vanished", table, slug)))?;

    if selected.created {
        tracing::debug!("Created {} entry: {} ({})", table, name.trim(), slug);
    }

    Ok(Taxon {
        id: row.id().ok_or_else(|| crate::Error::MissingColumn {
            table: table.to_string(),
            column: "id".to_string(),
        })?,
        name: row.text(table, "name")?,
        slug: row.text(table, "slug")?,
    })
}

/// Resolve every name, keeping per-name outcomes in input order.
pub fn resolve_each(store: &mut dyn Store, table: &str, names: &[String]) -> Vec<Resolution> {
    names
        .iter()
        .map(|name| match resolve(store, table, name) {
            Ok(taxon) => Resolution::Resolved(taxon),
            Err(reason) => Resolution::Skipped {
                name: name.clone(),
                reason,
            },
        })
        .collect()
}

/// Resolve every name, silently dropping the ones that fail.
pub fn resolve_many(store: &mut dyn Store, table: &str, names: &[String]) -> Vec<Taxon> {
    resolve_each(store, table, names)
        .into_iter()
        .filter_map(|resolution| match resolution {
            Resolution::Resolved(taxon) => Some(taxon),
            Resolution::Skipped { name, reason } => {
                tracing::debug!("Skipping {} entry '{}': {}", table, name, reason);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Science Fiction"), "science-fiction");
        assert_eq!(slugify("  Action & Adventure "), "action-adventure");
        assert_eq!(slugify("Hành Động"), "hanh-dong");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
