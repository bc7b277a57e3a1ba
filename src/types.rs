use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Boxed, sendable future returned by the pluggable capabilities
/// (predictor, cluster client, publisher).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One of the conformance suites the watcher knows how to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    Compute,
    Network,
    Storage,
    Ssp,
    Tier2,
}

impl Suite {
    /// Every known suite, in discovery order.
    pub const ALL: [Suite; 5] = [
        Suite::Compute,
        Suite::Network,
        Suite::Storage,
        Suite::Ssp,
        Suite::Tier2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Suite::Compute => "compute",
            Suite::Network => "network",
            Suite::Storage => "storage",
            Suite::Ssp => "ssp",
            Suite::Tier2 => "tier2",
        }
    }

    /// `<suite>-log.txt`
    pub fn log_file_name(&self) -> String {
        format!("{}-log.txt", self.as_str())
    }

    /// Location of this suite's log under the results root:
    /// `<root>/<suite>/<suite>-log.txt`.
    pub fn log_path(&self, results_dir: &Path) -> PathBuf {
        results_dir.join(self.as_str()).join(self.log_file_name())
    }

    /// Runner script (relative to the scripts directory) and the `SIG`
    /// value it expects, if any.
    pub fn runner(&self) -> (&'static str, Option<&'static str>) {
        match self {
            Suite::Compute | Suite::Network | Suite::Storage => {
                ("kubevirt/test-kubevirt.sh", Some(self.as_str()))
            }
            Suite::Ssp => ("ssp/test-ssp.sh", None),
            Suite::Tier2 => ("tier2/test-tier2.sh", None),
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compute" => Ok(Suite::Compute),
            "network" => Ok(Suite::Network),
            "storage" => Ok(Suite::Storage),
            "ssp" => Ok(Suite::Ssp),
            "tier2" => Ok(Suite::Tier2),
            other => Err(format!(
                "unknown test suite: {other} (expected one of compute, network, storage, ssp, tier2)"
            )),
        }
    }
}

/// Parse a comma-separated suite list such as `"compute, ssp,,tier2"`.
///
/// Blank entries are skipped and duplicates collapse to the first occurrence.
pub fn parse_suite_list(list: &str) -> Result<Vec<Suite>, String> {
    let mut suites = Vec::new();
    for part in list.split(',') {
        if part.trim().is_empty() {
            continue;
        }
        let suite: Suite = part.parse()?;
        if !suites.contains(&suite) {
            suites.push(suite);
        }
    }
    Ok(suites)
}

/// How per-suite progress is folded into the overall percentage.
///
/// - `Weighted`: every test counts the same, so big suites dominate.
/// - `PerSuite`: every configured suite contributes an equal share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PercentMode {
    Weighted,
    PerSuite,
}

impl Default for PercentMode {
    fn default() -> Self {
        PercentMode::Weighted
    }
}

/// When the runtime writes progress to the owning job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PublishPolicy {
    /// Only when the change detector reports a difference.
    OnChange,
    /// Every cycle; `last-updated` still moves only on change.
    EveryCycle,
}

impl Default for PublishPolicy {
    fn default() -> Self {
        PublishPolicy::OnChange
    }
}
