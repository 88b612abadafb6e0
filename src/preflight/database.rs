//! Database preflight check.

use super::CheckResult;
use crate::models::config::Config;
use crate::store::SqliteStore;

/// Check that the database opens and its tables exist.
pub fn check(config: &Config) -> CheckResult {
    let path = &config.storage.database;
    match SqliteStore::open(path, &config.storage.tables) {
        Ok(_) => CheckResult::ok("Database", &path.display().to_string()),
        Err(e) => CheckResult::fail(
            "Database",
            &format!("cannot open {}: {}", path.display(), e),
            "Check storage.database and storage.tables in config.toml",
        ),
    }
}
