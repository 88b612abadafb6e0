//! Error log sink for non-fatal ingestion failures.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Records failures that are recovered from but must stay visible.
pub trait ErrorSink {
    /// Record `message` under the log identified by `log_id`.
    fn record(&self, message: &str, log_id: &str);
}

/// Appends timestamped entries to `<dir>/<log_id>`.
#[derive(Debug, Clone)]
pub struct FileErrorLog {
    dir: PathBuf,
}

impl FileErrorLog {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the file backing `log_id`.
    pub fn path_for(&self, log_id: &str) -> PathBuf {
        self.dir.join(log_id)
    }

    fn append(&self, message: &str, log_id: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(log_id))?;
        writeln!(
            file,
            "[{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        )?;
        writeln!(file, "{}", "-".repeat(40))
    }
}

impl ErrorSink for FileErrorLog {
    fn record(&self, message: &str, log_id: &str) {
        tracing::error!("{}", message);
        if let Err(e) = self.append(message, log_id) {
            tracing::warn!("Failed to write error log {}: {}", log_id, e);
        }
    }
}

/// Keeps entries in memory; used for dry runs and tests.
#[derive(Debug, Default)]
pub struct CollectedErrors {
    entries: Mutex<Vec<(String, String)>>,
}

impl CollectedErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(message, log_id)` pairs, oldest first.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl ErrorSink for CollectedErrors {
    fn record(&self, message: &str, log_id: &str) {
        tracing::error!("{}", message);
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((message.to_string(), log_id.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_error_log_appends() {
        let temp_dir = TempDir::new().unwrap();
        let log = FileErrorLog::new(temp_dir.path().join("logs"));

        log.record("Failed to insert film: A", "insert_movie.log");
        log.record("Failed to insert film: B", "insert_movie.log");

        let content = std::fs::read_to_string(log.path_for("insert_movie.log")).unwrap();
        assert!(content.contains("Failed to insert film: A"));
        assert!(content.contains("Failed to insert film: B"));
    }

    #[test]
    fn test_collected_errors() {
        let errors = CollectedErrors::new();
        errors.record("boom", "x.log");
        assert_eq!(errors.entries(), vec![("boom".to_string(), "x.log".to_string())]);
    }
}
