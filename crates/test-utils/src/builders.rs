#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use progress_watcher::predict::PredictedTotals;
use progress_watcher::progress::{aggregate, ProgressSnapshot};
use progress_watcher::track::SuiteRecord;
use progress_watcher::types::{PercentMode, Suite};

/// Fixed instant used as "now" in tests.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Builder for `SuiteRecord` to simplify test setup.
pub struct SuiteRecordBuilder {
    record: SuiteRecord,
}

impl SuiteRecordBuilder {
    pub fn new(suite: Suite) -> Self {
        let log_path = PathBuf::from("/results").join(suite.as_str()).join(suite.log_file_name());
        Self {
            record: SuiteRecord::new(suite, log_path, None, t0()),
        }
    }

    pub fn total(mut self, total: u64) -> Self {
        self.record.total = total;
        self
    }

    pub fn completed(mut self, completed: u64) -> Self {
        self.record.completed = completed;
        self
    }

    pub fn passed(mut self, passed: u64) -> Self {
        self.record.passed = passed;
        self
    }

    pub fn failed(mut self, failed: u64) -> Self {
        self.record.failed = failed;
        self
    }

    pub fn started_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.start_time = at;
        self
    }

    /// Mark finished at the given instant.
    pub fn finished_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.finished = true;
        self.record.end_time = Some(at);
        self
    }

    pub fn finished(self) -> Self {
        let at = self.record.start_time;
        self.finished_at(at)
    }

    pub fn build(self) -> SuiteRecord {
        self.record
    }
}

/// Weighted snapshot of `records` with no predictions, every suite
/// configured.
pub fn snapshot_of(records: &[SuiteRecord]) -> ProgressSnapshot {
    aggregate(
        records,
        &PredictedTotals::new(),
        &Suite::ALL,
        PercentMode::Weighted,
        t0(),
    )
}
