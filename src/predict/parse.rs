// src/predict/parse.rs

use crate::classify::patterns::{capture_count, GENERIC_TOTAL, GINKGO_TOTAL, PYTEST_TOTAL};

/// Extract the expected test count from dry-run output.
///
/// Heuristics, strongest first:
/// 1. Ginkgo's `Will run N of M specs` → N
/// 2. pytest's `collected N items` → N
/// 3. a generic `N tests to run` / `N test cases` / `N specs`
///
/// Returns `None` when nothing matches.
pub fn parse_test_count(output: &str) -> Option<u64> {
    [&*GINKGO_TOTAL, &*PYTEST_TOTAL, &*GENERIC_TOTAL]
        .into_iter()
        .find_map(|re| {
            output
                .lines()
                .find_map(|line| capture_count(re, line.trim()))
        })
}
