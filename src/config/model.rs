// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::publish::PodIdentity;
use crate::types::{PercentMode, PublishPolicy, Suite};

/// Optional settings file as read from TOML.
///
/// ```toml
/// [watcher]
/// results_dir = "/results"
/// suites = ["compute", "ssp"]
/// poll_interval = "300ms"
/// percent_mode = "weighted"   # or "per-suite"
/// publish = "on-change"       # or "every-cycle"
///
/// [dry_run]
/// enabled = true
/// timeout = "2m"
/// script_dir = "/scripts"
///
/// [annotations]
/// prefix = "test-progress"
/// ```
///
/// Every section and key is optional; command-line flags and environment
/// variables take precedence over anything set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watcher: WatcherSection,

    #[serde(default)]
    pub dry_run: DryRunSection,

    #[serde(default)]
    pub annotations: AnnotationsSection,
}

/// `[watcher]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatcherSection {
    #[serde(default)]
    pub results_dir: Option<PathBuf>,

    #[serde(default)]
    pub suites: Option<Vec<Suite>>,

    /// Human duration such as `"300ms"`.
    #[serde(default, with = "humantime_serde")]
    pub poll_interval: Option<Duration>,

    #[serde(default)]
    pub percent_mode: Option<PercentMode>,

    #[serde(default)]
    pub publish: Option<PublishPolicy>,
}

/// `[dry_run]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DryRunSection {
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Human duration such as `"2m"`.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,

    #[serde(default)]
    pub script_dir: Option<PathBuf>,
}

/// `[annotations]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationsSection {
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Fully resolved, validated settings the watcher runs with.
///
/// Built from CLI/env plus the optional file via
/// [`crate::config::resolve_settings`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub results_dir: PathBuf,
    pub suites: Vec<Suite>,
    pub poll_interval: Duration,
    pub percent_mode: PercentMode,
    pub publish_policy: PublishPolicy,
    pub dry_run: DryRunSettings,
    pub identity: PodIdentity,
    pub annotation_prefix: String,
    pub log: LogSettings,
}

#[derive(Debug, Clone)]
pub struct DryRunSettings {
    pub enabled: bool,
    pub timeout: Duration,
    pub script_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub file: PathBuf,
    pub stdout: bool,
    pub verbose: bool,
}
