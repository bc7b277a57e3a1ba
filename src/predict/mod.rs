// src/predict/mod.rs

//! Dry-run total prediction.
//!
//! Before the real suites produce any output, each configured suite's runner
//! can be launched in list-only mode to learn how many tests it will run.
//!
//! - [`TotalPredictor`] is the per-suite capability; [`ScriptPredictor`] is
//!   the production implementation that runs the suite scripts.
//! - [`predict_totals`] probes all suites concurrently under one deadline
//!   and keeps the results only if every probe finished in time.
//! - [`run_dry_run`] wraps that with the scratch directory lifecycle.
//! - [`parse`] extracts a count from captured runner output.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::types::{BoxFuture, Suite};

pub mod parse;
pub mod script;

pub use parse::parse_test_count;
pub use script::{resolve_script_dir, ScriptPredictor};

/// Name of the scratch directory created under the results root.
pub const SCRATCH_DIR_NAME: &str = ".dry-run";

/// Default outer deadline for the whole prediction phase.
pub const DEFAULT_DRY_RUN_TIMEOUT: Duration = Duration::from_secs(120);

/// Predicted test counts per suite, fixed once prediction is done.
///
/// A suite with no entry has no prediction, which is different from a
/// prediction of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictedTotals {
    totals: BTreeMap<Suite, u64>,
}

impl PredictedTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, suite: Suite, total: u64) {
        self.totals.insert(suite, total);
    }

    pub fn get(&self, suite: Suite) -> Option<u64> {
        self.totals.get(&suite).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Sum of all predicted totals.
    pub fn sum(&self) -> u64 {
        self.totals.values().fold(0u64, |acc, t| acc.saturating_add(*t))
    }

}

impl FromIterator<(Suite, u64)> for PredictedTotals {
    fn from_iter<I: IntoIterator<Item = (Suite, u64)>>(iter: I) -> Self {
        Self {
            totals: iter.into_iter().collect(),
        }
    }
}

/// Capability: learn a suite's test count without running its tests.
///
/// Production code uses [`ScriptPredictor`]; tests provide scripted fakes.
pub trait TotalPredictor: Send + Sync {
    /// `None` when no count could be determined.
    fn predict(&self, suite: Suite) -> BoxFuture<'_, Option<u64>>;
}

/// Probe every suite concurrently and collect the predictions.
///
/// If `deadline` elapses first, outstanding probes are abandoned and the
/// result is empty: a partial set of predictions would make the overall
/// total inconsistent.
pub async fn predict_totals(
    predictor: Arc<dyn TotalPredictor>,
    suites: &[Suite],
    deadline: Duration,
) -> PredictedTotals {
    let mut probes = JoinSet::new();
    for &suite in suites {
        let predictor = Arc::clone(&predictor);
        probes.spawn(async move {
            debug!(%suite, "discovering test total");
            (suite, predictor.predict(suite).await)
        });
    }

    let collect = async {
        let mut totals = PredictedTotals::new();
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok((suite, Some(total))) => {
                    info!(%suite, total, "discovered test total");
                    totals.insert(suite, total);
                }
                Ok((suite, None)) => {
                    info!(%suite, "could not discover test count (suite might not be available)");
                }
                Err(err) => {
                    warn!(error = %err, "dry-run probe task failed");
                }
            }
        }
        totals
    };

    match tokio::time::timeout(deadline, collect).await {
        Ok(totals) => totals,
        Err(_) => {
            warn!(
                timeout = %humantime::format_duration(deadline),
                "dry-run discovery timed out, falling back to dynamic discovery"
            );
            PredictedTotals::new()
        }
    }
}

/// Removes the scratch directory when dropped, whichever way prediction
/// ended.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl ScratchDir {
    pub fn create(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        fs.create_dir_all(&path)?;
        Ok(Self { path, fs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.fs.exists(&self.path) {
            return;
        }
        match self.fs.remove_dir_all(&self.path) {
            Ok(()) => debug!(path = ?self.path, "cleaned up dry-run directory"),
            Err(err) => warn!(path = ?self.path, error = %err, "failed to clean up dry-run directory"),
        }
    }
}

/// Full prediction phase: create `<results>/.dry-run` with one artifacts
/// directory per suite, probe, clean up.
pub async fn run_dry_run(
    fs: Arc<dyn FileSystem>,
    results_dir: &Path,
    predictor: Arc<dyn TotalPredictor>,
    suites: &[Suite],
    deadline: Duration,
) -> PredictedTotals {
    info!(suites = suites.len(), "running dry-run discovery to determine total test counts");

    let scratch = match ScratchDir::create(Arc::clone(&fs), results_dir.join(SCRATCH_DIR_NAME)) {
        Ok(scratch) => scratch,
        Err(err) => {
            warn!(error = %err, "failed to create dry-run directory; skipping prediction");
            return PredictedTotals::new();
        }
    };
    for suite in suites {
        let artifacts = scratch.path().join(suite.as_str());
        if let Err(err) = fs.create_dir_all(&artifacts) {
            warn!(%suite, error = %err, "failed to create dry-run artifacts directory");
        }
    }

    let totals = predict_totals(predictor, suites, deadline).await;
    info!(
        total = totals.sum(),
        suites = totals.len(),
        "pre-discovery complete"
    );
    totals
}
