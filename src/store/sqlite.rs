//! SQLite-backed store.

use super::{Condition, Row, Store, Value};
use crate::models::config::TableNames;
use crate::Result;
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            Value::Null => ValueRef::Null,
            Value::Integer(n) => ValueRef::Integer(*n),
            Value::Real(n) => ValueRef::Real(*n),
            Value::Text(s) => ValueRef::Text(s.as_bytes()),
            Value::Blob(bytes) => ValueRef::Blob(bytes),
        }))
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(n) => Value::Integer(n),
            ValueRef::Real(n) => Value::Real(n),
            ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) => Value::Text(s.to_string()),
                Err(_) => Value::Blob(bytes.to_vec()),
            },
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}

/// Store backed by a SQLite database file.
pub struct SqliteStore {
    conn: Connection,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl SqliteStore {
    /// Open (or create) a database and make sure the tables exist.
    pub fn open(path: &Path, tables: &TableNames) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        tracing::debug!("Opened database: {}", path.display());
        Self::with_connection(conn, tables)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(tables: &TableNames) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, tables)
    }

    fn with_connection(conn: Connection, tables: &TableNames) -> Result<Self> {
        let store = Self { conn };
        store.ensure_schema(tables)?;
        Ok(store)
    }

    fn ensure_schema(&self, tables: &TableNames) -> Result<()> {
        let film = ident(&tables.film)?;
        let genre = ident(&tables.genre)?;
        let country = ident(&tables.country)?;
        let episode = ident(&tables.episode)?;

        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {film} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                origin_name TEXT,
                thumb TEXT,
                coverUrl TEXT,
                genres TEXT,
                year INTEGER,
                country TEXT,
                view INTEGER DEFAULT 0,
                quality TEXT,
                duration TEXT,
                trailerEmbed TEXT,
                Casts TEXT,
                Production TEXT,
                hot INTEGER DEFAULT 0,
                votePoint INTEGER DEFAULT 0,
                voteNum INTEGER DEFAULT 0,
                imdb REAL DEFAULT 0,
                content TEXT,
                type TEXT NOT NULL,
                status TEXT,
                public INTEGER DEFAULT 1,
                slug TEXT NOT NULL,
                time TEXT,
                creater TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_{film}_slug_type ON {film} (slug, type);
            CREATE TABLE IF NOT EXISTS {genre} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                slug TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{genre}_slug ON {genre} (slug);
            CREATE TABLE IF NOT EXISTS {country} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                slug TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{country}_slug ON {country} (slug);
            CREATE TABLE IF NOT EXISTS {episode} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                movieId INTEGER NOT NULL,
                data TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_{episode}_movie ON {episode} (movieId);"
        ))?;
        Ok(())
    }
}

/// Validate a table or column name before it is spliced into SQL.
fn ident(name: &str) -> Result<&str> {
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(crate::Error::InvalidIdentifier(name.to_string()))
    }
}

/// `WHERE` clause with numbered placeholders starting after `offset`.
fn where_clause(condition: &Condition, offset: usize) -> Result<String> {
    if condition.clauses().is_empty() {
        return Ok(String::new());
    }
    let parts = condition
        .clauses()
        .iter()
        .enumerate()
        .map(|(i, (column, _))| Ok(format!("{} = ?{}", ident(column)?, offset + i + 1)))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(" WHERE {}", parts.join(" AND ")))
}

impl Store for SqliteStore {
    fn select_all(&mut self, table: &str, condition: &Condition) -> Result<Vec<Row>> {
        let sql = format!(
            "SELECT * FROM {}{} ORDER BY id",
            ident(table)?,
            where_clause(condition, 0)?
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt
            .query_map(
                params_from_iter(condition.clauses().iter().map(|(_, v)| v)),
                |row| {
                    let mut columns = Vec::with_capacity(names.len());
                    for (i, name) in names.iter().enumerate() {
                        columns.push((name.clone(), Value::from(row.get_ref(i)?)));
                    }
                    Ok(Row::new(columns))
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn insert(&mut self, table: &str, data: &[(&str, Value)]) -> Result<i64> {
        let columns = data
            .iter()
            .map(|(c, _)| ident(c))
            .collect::<Result<Vec<_>>>()?;
        let placeholders: Vec<String> = (1..=data.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            ident(table)?,
            columns.join(", "),
            placeholders.join(", ")
        );

        self.conn
            .execute(&sql, params_from_iter(data.iter().map(|(_, v)| v)))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&mut self, table: &str, set: &[(&str, Value)], condition: &Condition) -> Result<()> {
        let assignments = set
            .iter()
            .enumerate()
            .map(|(i, (c, _))| Ok(format!("{} = ?{}", ident(c)?, i + 1)))
            .collect::<Result<Vec<_>>>()?;
        let sql = format!(
            "UPDATE {} SET {}{}",
            ident(table)?,
            assignments.join(", "),
            where_clause(condition, set.len())?
        );

        let params = set
            .iter()
            .map(|(_, v)| v)
            .chain(condition.clauses().iter().map(|(_, v)| v));
        self.conn.execute(&sql, params_from_iter(params))?;
        Ok(())
    }

    fn delete_from(&mut self, table: &str) -> Result<()> {
        self.conn
            .execute(&format!("DELETE FROM {}", ident(table)?), [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_validation() {
        assert!(ident("movie").is_ok());
        assert!(ident("coverUrl").is_ok());
        assert!(ident("movie; DROP TABLE x").is_err());
        assert!(ident("1abc").is_err());
        assert!(ident("").is_err());
    }

    #[test]
    fn test_where_clause_offsets() {
        let condition = Condition::eq("slug", "x").and("type", "movie");
        assert_eq!(where_clause(&condition, 0).unwrap(), " WHERE slug = ?1 AND type = ?2");
        assert_eq!(where_clause(&condition, 1).unwrap(), " WHERE slug = ?2 AND type = ?3");
        assert_eq!(where_clause(&Condition::default(), 0).unwrap(), "");
    }
}
