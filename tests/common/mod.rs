#![allow(dead_code)]

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use progress_watcher::types::Suite;

pub use progress_watcher_test_utils::builders::t0;
pub use progress_watcher_test_utils::{init_tracing, with_timeout};

/// Create `<results>/<suite>/` and return the suite's log path.
pub fn suite_log(results: &Path, suite: Suite) -> PathBuf {
    let dir = results.join(suite.as_str());
    std::fs::create_dir_all(&dir).expect("create suite dir");
    suite.log_path(results)
}

/// Append raw text to a log file, creating it if needed.
pub fn append(path: &Path, text: &str) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .expect("open log for append");
    file.write_all(text.as_bytes()).expect("append to log");
}
