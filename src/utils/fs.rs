//! File system utilities.

use crate::Result;
use std::path::Path;

/// Check that a path exists.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::other(format!(
            "Path not found: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Get file extension in lowercase.
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Check if a file is a scraped item file based on extension.
pub fn is_json_file(path: &Path) -> bool {
    get_extension(path).map(|ext| ext == "json").unwrap_or(false)
}

/// Check that a directory can be created and written to.
pub fn is_writable_dir(path: &Path) -> bool {
    if std::fs::create_dir_all(path).is_err() {
        return false;
    }
    let probe = path.join(".write_probe");
    let ok = std::fs::write(&probe, b"").is_ok();
    let _ = std::fs::remove_file(&probe);
    ok
}
