// src/engine/core.rs

//! Monitor state for the polling loop.
//!
//! [`Monitor`] owns everything the loop mutates between cycles: the tracked
//! suites with their read cursors, the classifier, the fixed dry-run
//! predictions and the last published snapshot. It performs file IO through
//! the [`FileSystem`] trait but has no Tokio types, so tests can drive it
//! cycle by cycle against a [`crate::fs::mock::MockFileSystem`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::classify::Classifier;
use crate::fs::FileSystem;
use crate::predict::PredictedTotals;
use crate::progress::{aggregate, ChangeDetector, ProgressSnapshot};
use crate::track::{discover_suites, LogTail, SuiteRecord};
use crate::types::{PercentMode, Suite};

/// A discovered suite: its progress record plus the cursor into its log.
#[derive(Debug)]
pub struct TrackedSuite {
    pub record: SuiteRecord,
    pub tail: LogTail,
}

#[derive(Debug)]
pub struct Monitor {
    fs: Arc<dyn FileSystem>,
    results_dir: PathBuf,
    configured: Vec<Suite>,
    predicted: PredictedTotals,
    tracked: Vec<TrackedSuite>,
    classifier: Classifier,
    detector: ChangeDetector,
    percent_mode: PercentMode,
    verbose: bool,
}

impl Monitor {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        results_dir: impl Into<PathBuf>,
        configured: Vec<Suite>,
        predicted: PredictedTotals,
    ) -> Self {
        Self {
            fs,
            results_dir: results_dir.into(),
            configured,
            predicted,
            tracked: Vec::new(),
            classifier: Classifier::standard(),
            detector: ChangeDetector::new(),
            percent_mode: PercentMode::default(),
            verbose: false,
        }
    }

    pub fn with_percent_mode(mut self, mode: PercentMode) -> Self {
        self.percent_mode = mode;
        self
    }

    /// Log every processed line at debug level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn records(&self) -> impl Iterator<Item = &SuiteRecord> + '_ {
        self.tracked.iter().map(|t| &t.record)
    }

    pub fn record(&self, suite: Suite) -> Option<&SuiteRecord> {
        self.records().find(|r| r.suite == suite)
    }

    pub fn is_tracking(&self, suite: Suite) -> bool {
        self.tracked.iter().any(|t| t.record.suite == suite)
    }

    /// Start tracking every suite whose log appeared since the last call.
    /// Returns how many were added.
    pub fn discover(&mut self, now: DateTime<Utc>) -> usize {
        let mut added = 0;
        for (suite, log_path) in discover_suites(self.fs.as_ref(), &self.results_dir) {
            if self.is_tracking(suite) {
                continue;
            }
            let predicted = self.predicted.get(suite);
            info!(
                %suite,
                log = ?log_path,
                predicted_total = predicted,
                "discovered suite"
            );
            let tail = LogTail::new(&log_path);
            self.tracked.push(TrackedSuite {
                record: SuiteRecord::new(suite, log_path, predicted, now),
                tail,
            });
            added += 1;
        }
        added
    }

    /// Read and classify every newly appended line of every tracked suite.
    /// Returns the number of lines processed.
    pub fn drain(&mut self, now: DateTime<Utc>) -> usize {
        let mut processed = 0;
        for tracked in &mut self.tracked {
            let lines = match tracked.tail.read_new_lines(self.fs.as_ref()) {
                Ok(lines) => lines,
                Err(err) => {
                    warn!(
                        suite = %tracked.record.suite,
                        error = %err,
                        "error reading suite log"
                    );
                    continue;
                }
            };

            for line in &lines {
                if self.verbose {
                    debug!(suite = %tracked.record.suite, line = %line, "processing line");
                }
                self.classifier.classify(&mut tracked.record, line, now);
            }
            processed += lines.len();
        }
        processed
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> ProgressSnapshot {
        aggregate(
            self.records(),
            &self.predicted,
            &self.configured,
            self.percent_mode,
            now,
        )
    }

    /// Current snapshot and whether it differs from the last committed one.
    pub fn evaluate(&self, now: DateTime<Utc>) -> (ProgressSnapshot, bool) {
        let snapshot = self.snapshot(now);
        let changed = self.detector.has_changed(&snapshot);
        (snapshot, changed)
    }

    /// Adopt `snapshot` as the published baseline.
    pub fn commit(&mut self, snapshot: ProgressSnapshot) {
        self.detector.commit(snapshot);
    }

    /// Release every open log handle. Returns how many were open.
    pub fn close(&mut self) -> usize {
        self.tracked
            .iter_mut()
            .map(|t| t.tail.close())
            .filter(|closed| *closed)
            .count()
    }
}
