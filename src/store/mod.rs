//! Storage boundary.
//!
//! The engine only talks to storage through [`Store`]: equality lookups,
//! get-or-create, insert, update and table reset. Values are bound, never
//! spliced; [`Condition`] and [`update_statement`] render SQL literals for
//! logging only.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::Result;
use std::fmt;

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Text content, decoding UTF-8 blobs.
    pub fn as_text(&self) -> Option<std::result::Result<String, std::string::FromUtf8Error>> {
        match self {
            Value::Text(s) => Some(Ok(s.clone())),
            Value::Blob(bytes) => Some(String::from_utf8(bytes.clone())),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Real(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Blob(bytes)
    }
}

/// SQL literal form, with single quotes doubled.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Real(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", quote_literal(s)),
            Value::Blob(bytes) => {
                write!(f, "X'")?;
                for b in bytes {
                    write!(f, "{:02X}", b)?;
                }
                write!(f, "'")
            }
        }
    }
}

/// Quote text as an SQL string literal.
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Conjunction of column equalities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    clauses: Vec<(String, Value)>,
}

impl Condition {
    /// Single `column = value` clause.
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::default().and(column, value)
    }

    /// Add another `column = value` clause.
    pub fn and(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.clauses.push((column.to_string(), value.into()));
        self
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    /// Whether a row satisfies every clause.
    pub fn matches(&self, row: &Row) -> bool {
        self.clauses
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (column, value)) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{} = {}", column, value)?;
        }
        Ok(())
    }
}

/// Render an UPDATE statement with literal values.
pub fn update_statement(table: &str, set: &[(&str, Value)], condition: &Condition) -> String {
    let assignments: Vec<String> = set
        .iter()
        .map(|(column, value)| format!("{}={}", column, value))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {}",
        table,
        assignments.join(", "),
        condition
    )
}

/// A stored row: ordered column/value pairs, `id` first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Row identifier.
    pub fn id(&self) -> Option<i64> {
        self.get("id").and_then(Value::as_i64)
    }

    /// Text column, decoding UTF-8 blobs.
    pub fn text(&self, table: &str, column: &str) -> Result<String> {
        match self.get(column).and_then(Value::as_text) {
            Some(Ok(text)) => Ok(text),
            Some(Err(_)) => Err(crate::Error::InvalidEncoding(format!("{}.{}", table, column))),
            None => Err(crate::Error::MissingColumn {
                table: table.to_string(),
                column: column.to_string(),
            }),
        }
    }

    pub(crate) fn set(&mut self, column: &str, value: Value) {
        match self.columns.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((column.to_string(), value)),
        }
    }
}

/// Result of a get-or-create.
#[derive(Debug, Clone, PartialEq)]
pub struct Selected {
    /// Matching rows, or the freshly created one.
    pub rows: Vec<Row>,
    /// Whether the row was created by this call.
    pub created: bool,
}

/// Row store consumed by the ingestion engine.
pub trait Store {
    /// Every row matching `condition`, in id order.
    fn select_all(&mut self, table: &str, condition: &Condition) -> Result<Vec<Row>>;

    /// Insert a row and return its identifier.
    fn insert(&mut self, table: &str, data: &[(&str, Value)]) -> Result<i64>;

    /// Set columns on every row matching `condition`.
    fn update(&mut self, table: &str, set: &[(&str, Value)], condition: &Condition) -> Result<()>;

    /// Remove every row from `table`.
    fn delete_from(&mut self, table: &str) -> Result<()>;

    /// Matching rows, inserting `data` first when nothing matches.
    ///
    /// Not atomic: two processes can both miss and both insert.
    fn select_or_insert(
        &mut self,
        table: &str,
        condition: &Condition,
        data: &[(&str, Value)],
    ) -> Result<Selected> {
        let rows = self.select_all(table, condition)?;
        if !rows.is_empty() {
            return Ok(Selected {
                rows,
                created: false,
            });
        }

        self.insert(table, data)?;
        let rows = self.select_all(table, condition)?;
        Ok(Selected {
            rows,
            created: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_escaping() {
        assert_eq!(quote_literal("Grey's Anatomy"), "'Grey''s Anatomy'");
        assert_eq!(Value::Integer(7).to_string(), "7");
        assert_eq!(Value::Blob(vec![0xAB, 0x01]).to_string(), "X'AB01'");
    }

    #[test]
    fn test_condition_display() {
        let condition = Condition::eq("slug", "it's").and("type", "movie");
        assert_eq!(condition.to_string(), "slug = 'it''s' AND type = 'movie'");
    }

    #[test]
    fn test_update_statement() {
        let statement = update_statement(
            "episode",
            &[("data", Value::from(r#"[{"episode_name":"Don't"}]"#))],
            &Condition::eq("movieId", 5i64),
        );
        assert_eq!(
            statement,
            r#"UPDATE episode SET data='[{"episode_name":"Don''t"}]' WHERE movieId = 5"#
        );
    }

    #[test]
    fn test_row_text_decodes_blob() {
        let row = Row::new(vec![
            ("id".to_string(), Value::Integer(1)),
            ("data".to_string(), Value::Blob(b"[]".to_vec())),
        ]);
        assert_eq!(row.id(), Some(1));
        assert_eq!(row.text("episode", "data").unwrap(), "[]");
        assert!(row.text("episode", "missing").is_err());
    }
}
