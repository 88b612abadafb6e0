//! Change-detecting episode writer.
//!
//! The serialized season list is the unit of comparison: a write happens
//! only when the stored text differs byte-for-byte. Stale content is
//! replaced wholesale.

use crate::models::config::TableNames;
use crate::models::episode::Season;
use crate::store::{update_statement, Condition, Store, Value};
use crate::Result;

/// Film id column of the episode table.
const FILM_ID_COLUMN: &str = "movieId";
/// Document column of the episode table.
const DATA_COLUMN: &str = "data";

/// What the writer did with an episode document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// First document for the film.
    Created,
    /// Stored document already matched.
    Unchanged,
    /// Stored document was replaced.
    Updated,
}

/// Serialize seasons to their stored form.
pub fn serialize_seasons(seasons: &[Season]) -> Result<String> {
    Ok(serde_json::to_string(seasons)?)
}

/// Writes episode documents only when they change.
pub struct EpisodeWriter<'a> {
    tables: &'a TableNames,
}

impl<'a> EpisodeWriter<'a> {
    pub fn new(tables: &'a TableNames) -> Self {
        Self { tables }
    }

    /// Persist `seasons` for `film_id` unless the stored copy is identical.
    pub fn write_if_changed(
        &self,
        store: &mut dyn Store,
        film_id: i64,
        seasons: &[Season],
    ) -> Result<WriteOutcome> {
        let table = &self.tables.episode;
        let data = serialize_seasons(seasons)?;
        let condition = Condition::eq(FILM_ID_COLUMN, film_id);

        let selected = store.select_or_insert(
            table,
            &condition,
            &[
                (FILM_ID_COLUMN, Value::Integer(film_id)),
                (DATA_COLUMN, Value::from(data.as_str())),
            ],
        )?;
        let row = selected.rows.first().ok_or_else(|| {
            crate::Error::other(format!("{} row for film {} vanished", table, film_id))
        })?;
        let stored = row.text(table, DATA_COLUMN)?;

        if stored == data {
            return Ok(if selected.created {
                WriteOutcome::Created
            } else {
                WriteOutcome::Unchanged
            });
        }

        let set = [(DATA_COLUMN, Value::from(data))];
        tracing::debug!("{}", update_statement(table, &set, &condition));
        store.update(table, &set, &condition)?;
        Ok(WriteOutcome::Updated)
    }
}
