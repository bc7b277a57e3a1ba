// src/progress/mod.rs

//! Progress aggregation and change detection.
//!
//! [`aggregate`] folds the tracked [`SuiteRecord`]s and the dry-run
//! predictions into an immutable [`ProgressSnapshot`]. [`ChangeDetector`]
//! keeps the last published snapshot and decides whether a new one is worth
//! publishing.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::predict::PredictedTotals;
use crate::track::SuiteRecord;
use crate::types::{PercentMode, Suite};

mod detector;

pub use detector::ChangeDetector;

/// Progress of one suite as published.
///
/// Equality ignores `duration`, which moves with the clock alone.
#[derive(Debug, Clone, Eq)]
pub struct SuiteProgress {
    pub total: u64,
    pub completed: u64,
    pub passed: u64,
    pub failed: u64,
    pub percent: u64,
    pub finished: bool,
    /// `false` for a predicted suite whose log has not appeared yet.
    pub started: bool,
    pub duration: Option<Duration>,
}

impl PartialEq for SuiteProgress {
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total
            && self.completed == other.completed
            && self.passed == other.passed
            && self.failed == other.failed
            && self.percent == other.percent
            && self.finished == other.finished
            && self.started == other.started
    }
}

impl SuiteProgress {
    fn from_record(record: &SuiteRecord, now: DateTime<Utc>) -> Self {
        Self {
            total: record.total,
            completed: record.completed,
            passed: record.passed,
            failed: record.failed,
            percent: record.percent(),
            finished: record.finished,
            started: true,
            duration: Some(record.duration(now)),
        }
    }

    fn predicted(total: u64) -> Self {
        Self {
            total,
            completed: 0,
            passed: 0,
            failed: 0,
            percent: 0,
            finished: false,
            started: false,
            duration: None,
        }
    }
}

/// Overall progress for one polling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub total: u64,
    pub completed: u64,
    pub passed: u64,
    pub failed: u64,
    pub percent: u64,
    /// Number of suites whose log has been discovered.
    pub active_suites: usize,
    pub suites: BTreeMap<Suite, SuiteProgress>,
}

impl ProgressSnapshot {
    pub fn suite(&self, suite: Suite) -> Option<&SuiteProgress> {
        self.suites.get(&suite)
    }
}

/// Combine tracked suites and predictions into a snapshot.
///
/// Every configured suite that has a prediction but no log yet contributes
/// its predicted total (and nothing completed). Once a suite is tracked only
/// its record counts, so a prediction is never counted twice.
pub fn aggregate<'a>(
    records: impl IntoIterator<Item = &'a SuiteRecord>,
    predicted: &PredictedTotals,
    configured: &[Suite],
    mode: PercentMode,
    now: DateTime<Utc>,
) -> ProgressSnapshot {
    let mut suites: BTreeMap<Suite, SuiteProgress> = BTreeMap::new();
    let mut total: u64 = 0;
    let mut completed: u64 = 0;
    let mut passed: u64 = 0;
    let mut failed: u64 = 0;

    for record in records {
        total = total.saturating_add(record.total);
        completed = completed.saturating_add(record.completed);
        passed = passed.saturating_add(record.passed);
        failed = failed.saturating_add(record.failed);
        suites.insert(record.suite, SuiteProgress::from_record(record, now));
    }
    let active_suites = suites.len();

    for suite in configured {
        if suites.contains_key(suite) {
            continue;
        }
        if let Some(predicted_total) = predicted.get(*suite) {
            total = total.saturating_add(predicted_total);
            suites.insert(*suite, SuiteProgress::predicted(predicted_total));
        }
    }

    let percent = match mode {
        PercentMode::Weighted => {
            if total > 0 {
                completed.saturating_mul(100) / total
            } else {
                0
            }
        }
        PercentMode::PerSuite => per_suite_percent(&suites, configured),
    };

    ProgressSnapshot {
        total,
        completed,
        passed,
        failed,
        percent,
        active_suites,
        suites,
    }
}

/// Mean of per-suite percentages over every configured or tracked suite;
/// suites that have not started count as zero.
fn per_suite_percent(suites: &BTreeMap<Suite, SuiteProgress>, configured: &[Suite]) -> u64 {
    let mut members: Vec<Suite> = configured.to_vec();
    for suite in suites.keys() {
        if !members.contains(suite) {
            members.push(*suite);
        }
    }
    if members.is_empty() {
        return 0;
    }

    let sum: u64 = members
        .iter()
        .filter_map(|s| suites.get(s))
        .map(|p| p.percent)
        .sum();
    sum / members.len() as u64
}
