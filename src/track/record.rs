// src/track/record.rs

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::types::Suite;

/// Result of a single test as reported by a per-test log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed,
}

/// Mutable progress record for one monitored suite.
///
/// `completed`, `passed` and `failed` only grow while the suite is running;
/// `finished` only ever flips from `false` to `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteRecord {
    pub suite: Suite,
    pub log_path: PathBuf,
    /// Expected number of tests; `0` means unknown.
    pub total: u64,
    pub completed: u64,
    pub passed: u64,
    pub failed: u64,
    pub finished: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl SuiteRecord {
    /// Start tracking a suite whose log was first seen at `now`, seeding the
    /// total from a dry-run prediction when one exists.
    pub fn new(
        suite: Suite,
        log_path: impl Into<PathBuf>,
        predicted_total: Option<u64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            suite,
            log_path: log_path.into(),
            total: predicted_total.unwrap_or(0),
            completed: 0,
            passed: 0,
            failed: 0,
            finished: false,
            start_time: now,
            end_time: None,
        }
    }

    /// `100` once finished, otherwise `completed * 100 / total` (integer
    /// division), or `0` while the total is unknown.
    pub fn percent(&self) -> u64 {
        if self.finished {
            100
        } else if self.total > 0 {
            self.completed.saturating_mul(100) / self.total
        } else {
            0
        }
    }

    /// Wall-clock time spent so far, or the final run time once finished.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        let end = self.end_time.unwrap_or(now);
        (end - self.start_time).to_std().unwrap_or_default()
    }

    /// Mark the suite finished. Returns `false` if it already was.
    pub fn mark_finished(&mut self, now: DateTime<Utc>, reason: &str) -> bool {
        if self.finished {
            return false;
        }
        self.finished = true;
        self.end_time = Some(now);
        if self.total == 0 {
            self.total = self.completed;
        }
        info!(
            suite = %self.suite,
            duration = %humantime::format_duration(whole_seconds(self.duration(now))),
            reason,
            "suite finished"
        );
        true
    }

    /// Finish the suite if the known total has been reached.
    pub fn finish_if_complete(&mut self, now: DateTime<Utc>) -> bool {
        if !self.finished && self.total > 0 && self.completed >= self.total {
            return self.mark_finished(now, "reached total count");
        }
        false
    }

    /// Count one completed test and re-check the total.
    pub fn record_completion(&mut self, outcome: TestOutcome, now: DateTime<Utc>) {
        self.completed += 1;
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed => self.failed += 1,
        }
        info!(
            suite = %self.suite,
            completed = self.completed,
            total = self.total,
            passed = self.passed,
            failed = self.failed,
            "test completed"
        );
        self.finish_if_complete(now);
    }

    /// Overwrite the pass/fail tallies from a summary line.
    pub fn apply_summary(&mut self, passed: Option<u64>, failed: Option<u64>) {
        if let Some(passed) = passed {
            self.passed = passed;
            info!(suite = %self.suite, passed, "updated pass count from summary");
        }
        if let Some(failed) = failed {
            self.failed = failed;
            info!(suite = %self.suite, failed, "updated fail count from summary");
        }
        if self.total > 0 && self.passed.saturating_add(self.failed) > self.total {
            warn!(
                suite = %self.suite,
                passed = self.passed,
                failed = self.failed,
                total = self.total,
                "summary tallies exceed the known total"
            );
        }
    }
}

/// Drop sub-second precision so durations render as `1m 30s`.
pub fn whole_seconds(duration: Duration) -> Duration {
    Duration::from_secs(duration.as_secs())
}
