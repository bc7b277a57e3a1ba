// src/predict/script.rs

//! Dry-run probes backed by the suite runner scripts.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::predict::{parse_test_count, TotalPredictor};
use crate::types::{BoxFuture, Suite};

/// Places searched for the scripts directory when none is configured.
pub const SCRIPT_DIR_CANDIDATES: &[&str] =
    &["/scripts", "/workspace/scripts", "./scripts", "../scripts"];

/// Script whose presence identifies a scripts directory.
const MARKER_SCRIPT: &str = "kubevirt/test-kubevirt.sh";

/// Pick the scripts directory: the configured one if any, otherwise the
/// first candidate that contains the kubevirt runner. Relative hits are made
/// absolute.
pub fn resolve_script_dir(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = configured {
        debug!(dir = ?dir, "using configured scripts directory");
        return Some(dir.to_path_buf());
    }

    SCRIPT_DIR_CANDIDATES.iter().map(Path::new).find_map(|dir| {
        if !dir.join(MARKER_SCRIPT).exists() {
            return None;
        }
        let resolved = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
        };
        debug!(dir = ?resolved, "found scripts directory");
        Some(resolved)
    })
}

/// Runs each suite's runner script with the dry-run switches set and parses
/// the captured output.
#[derive(Debug, Clone)]
pub struct ScriptPredictor {
    /// `<results>/.dry-run`; handed to the scripts as `RESULTS_DIR`.
    scratch_root: PathBuf,
    script_dir: Option<PathBuf>,
}

impl ScriptPredictor {
    pub fn new(scratch_root: impl Into<PathBuf>, script_dir: Option<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
            script_dir,
        }
    }

    /// The artifacts directory `<scratch>/<suite>` is created beforehand by
    /// [`crate::predict::run_dry_run`].
    fn build_command(&self, suite: Suite, script_dir: &Path) -> Command {
        let artifacts = self.scratch_root.join(suite.as_str());

        let (script, sig) = suite.runner();
        let mut cmd = Command::new("/bin/bash");
        cmd.arg(script_dir.join(script))
            .env("DRY_RUN", "true")
            .env("DRY_RUN_FLAG", "--ginkgo.dry-run")
            .env("RESULTS_DIR", &self.scratch_root)
            .env("ARTIFACTS", &artifacts)
            .env("SCRIPT_DIR", script_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(sig) = sig {
            cmd.env("SIG", sig);
        }

        // Scripts resolve their helpers relative to the repository root.
        if script_dir.is_absolute() {
            if let Some(parent) = script_dir.parent() {
                cmd.current_dir(parent);
            }
        }
        cmd
    }

    async fn probe(&self, suite: Suite) -> Result<Option<u64>> {
        let Some(script_dir) = self.script_dir.as_deref() else {
            anyhow::bail!("could not find scripts directory");
        };

        let mut cmd = self.build_command(suite, script_dir);
        debug!(%suite, command = ?cmd.as_std(), "executing dry-run command");

        let output = cmd
            .output()
            .await
            .with_context(|| format!("running dry-run for suite '{suite}'"))?;

        // Combined stdout + stderr; the exit status is advisory only.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            debug!(%suite, bytes = combined.len(), "dry-run succeeded");
        } else {
            warn!(%suite, status = %output.status, "dry-run exited unsuccessfully; parsing output anyway");
            debug!(%suite, output = %truncate(&combined, 500), "dry-run output");
        }

        let count = parse_test_count(&combined);
        if count.is_none() {
            info!(%suite, "could not parse test count from dry-run output");
        }
        Ok(count)
    }
}

impl TotalPredictor for ScriptPredictor {
    fn predict(&self, suite: Suite) -> BoxFuture<'_, Option<u64>> {
        Box::pin(async move {
            match self.probe(suite).await {
                Ok(count) => count,
                Err(err) => {
                    warn!(%suite, error = %format!("{err:#}"), "dry-run failed");
                    None
                }
            }
        })
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
