//! Cover directory preflight check.

use super::CheckResult;
use crate::models::config::Config;
use crate::utils::fs::is_writable_dir;

/// Check that cached covers can be written.
pub fn check(config: &Config) -> CheckResult {
    if !config.cover.enabled {
        return CheckResult::ok("Covers", "caching disabled");
    }

    let dir = config.cover.save_path.join("covers");
    if is_writable_dir(&dir) {
        CheckResult::ok("Covers", &dir.display().to_string())
    } else {
        CheckResult::fail(
            "Covers",
            &format!("{} is not writable", dir.display()),
            "Fix permissions or set cover.enabled = false",
        )
    }
}
