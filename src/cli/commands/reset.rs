//! Reset command implementation.
//!
//! Clears every table the ingester writes to.

use crate::models::config::{Config, TableNames};
use crate::store::{SqliteStore, Store};
use crate::Result;
use colored::Colorize;

/// Delete every row from the configured tables.
pub fn reset_tables(store: &mut dyn Store, tables: &TableNames) -> Result<()> {
    for table in tables.all() {
        store.delete_from(table)?;
        tracing::info!("Cleared table: {}", table);
    }
    Ok(())
}

/// Reset the configured database.
pub fn reset(config: &Config, confirm: bool) -> Result<()> {
    let path = &config.storage.database;

    if !confirm {
        println!(
            "{} This deletes every film, taxonomy and episode row in {}",
            "[WARNING]".bold().yellow(),
            path.display()
        );
        println!("  Re-run with {} to proceed", "--confirm".cyan());
        return Ok(());
    }

    let mut store = SqliteStore::open(path, &config.storage.tables)?;
    reset_tables(&mut store, &config.storage.tables)?;

    println!(
        "{} {}",
        "[OK] Cleared tables:".bold().green(),
        config.storage.tables.all().join(", ")
    );
    Ok(())
}
