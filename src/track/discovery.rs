// src/track/discovery.rs

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::fs::FileSystem;
use crate::predict::SCRATCH_DIR_NAME;
use crate::types::Suite;

/// Directory entries under the results root that never hold a suite.
pub const IGNORED_ENTRIES: &[&str] = &["lost+found", SCRATCH_DIR_NAME];

/// Find every known suite whose log file currently exists under
/// `results_dir`.
///
/// Results are ordered by [`Suite::ALL`] so repeated calls see suites in a
/// stable order. A missing or unreadable results directory simply yields an
/// empty list; callers retry on the next cycle.
pub fn discover_suites(fs: &dyn FileSystem, results_dir: &Path) -> Vec<(Suite, PathBuf)> {
    let entries = match fs.read_dir(results_dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = ?results_dir, error = %err, "results directory not readable yet");
            return Vec::new();
        }
    };

    let mut found: Vec<(Suite, PathBuf)> = Vec::new();
    for entry in entries {
        let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if IGNORED_ENTRIES.contains(&name) {
            trace!(entry = name, "skipping non-suite entry");
            continue;
        }
        if !fs.is_dir(&entry) {
            continue;
        }
        let Ok(suite) = name.parse::<Suite>() else {
            trace!(entry = name, "directory is not a known suite");
            continue;
        };

        let log_path = suite.log_path(results_dir);
        if fs.is_file(&log_path) && !found.iter().any(|(s, _)| *s == suite) {
            found.push((suite, log_path));
        }
    }

    found.sort_by_key(|(suite, _)| *suite);
    found
}
