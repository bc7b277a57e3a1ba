// src/classify/patterns.rs

//! Text patterns for the two supported runner output styles.
//!
//! Ginkgo (compute, network, storage, ssp) prints `Will run N of M specs`
//! up front and one `•` line per finished spec. Pytest (tier2) prints
//! `collected N items` and, through the suite wrapper, `TEST: ... PASSED`
//! lines.

use std::sync::LazyLock;

use regex::Regex;

/// `Will run 50 of 100 specs` → 50
pub static GINKGO_TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Will run (\d+) of \d+ specs").expect("valid regex"));

/// `collected 25 items` → 25
pub static PYTEST_TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"collected (\d+) items?").expect("valid regex"));

/// Last-resort dry-run count: `15 tests to run`, `8 test cases`, `12 specs`.
pub static GENERIC_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s+(?:tests?\s+to\s+run|test\s+cases?|specs?)\b").expect("valid regex")
});

pub static SUMMARY_PASSED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+passed").expect("valid regex"));

pub static SUMMARY_FAILED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+failed").expect("valid regex"));

/// Per-spec completion marker printed by Ginkgo.
pub const GINKGO_SPEC_MARKER: &str = "•";

/// Failure marker embedded in a Ginkgo spec line.
pub const GINKGO_FAILED_MARKER: &str = "[FAILED]";

/// Prefix of a per-test line printed by the pytest wrapper.
pub const PYTEST_TEST_PREFIX: &str = "TEST:";

/// Keywords that open a run summary.
pub const FINISH_MARKERS: &[&str] = &[
    "Ran ",
    "short test summary info",
    "PASS:",
    "FAIL:",
    "tests completed",
];

/// Words that must appear alongside a finish marker.
pub const FINISH_QUALIFIERS: &[&str] = &["second", "passed", "failed", "complete"];

/// First capture group of `re` in `text`, parsed as a count.
pub fn capture_count(re: &Regex, text: &str) -> Option<u64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
