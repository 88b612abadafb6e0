//! In-memory store used for dry runs and tests.

use super::{Condition, Row, Store, Value};
use crate::Result;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: Vec<Row>,
}

/// Ordered in-memory tables with auto-increment ids.
///
/// Every insert, update and delete counts as one write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Table>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes issued so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// All rows of a table, in insert order.
    pub fn rows(&self, table: &str) -> &[Row] {
        self.tables
            .get(table)
            .map(|t| t.rows.as_slice())
            .unwrap_or(&[])
    }
}

impl Store for MemoryStore {
    fn select_all(&mut self, table: &str, condition: &Condition) -> Result<Vec<Row>> {
        Ok(self
            .rows(table)
            .iter()
            .filter(|row| condition.matches(row))
            .cloned()
            .collect())
    }

    fn insert(&mut self, table: &str, data: &[(&str, Value)]) -> Result<i64> {
        let table = self.tables.entry(table.to_string()).or_default();
        table.next_id += 1;
        let id = table.next_id;

        let mut columns = vec![("id".to_string(), Value::Integer(id))];
        columns.extend(data.iter().map(|(c, v)| (c.to_string(), v.clone())));
        table.rows.push(Row::new(columns));

        self.writes += 1;
        Ok(id)
    }

    fn update(&mut self, table: &str, set: &[(&str, Value)], condition: &Condition) -> Result<()> {
        if let Some(table) = self.tables.get_mut(table) {
            for row in table.rows.iter_mut().filter(|row| condition.matches(row)) {
                for (column, value) in set {
                    row.set(column, value.clone());
                }
            }
        }
        self.writes += 1;
        Ok(())
    }

    fn delete_from(&mut self, table: &str) -> Result<()> {
        if let Some(table) = self.tables.get_mut(table) {
            table.rows.clear();
        }
        self.writes += 1;
        Ok(())
    }
}
