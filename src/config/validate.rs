// src/config/validate.rs

use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::model::{DryRunSettings, LogSettings, RawConfigFile, Settings};
use crate::errors::{Result, WatcherError};
use crate::predict::DEFAULT_DRY_RUN_TIMEOUT;
use crate::publish::{PodIdentity, DEFAULT_PREFIX};
use crate::types::{parse_suite_list, Suite};

/// Default pause between polling cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Merge the settings file with CLI/env values and validate the result.
///
/// Command-line and environment values win over the file; the file wins
/// over built-in defaults.
pub fn resolve_settings(raw: RawConfigFile, args: &CliArgs) -> Result<Settings> {
    let results_dir = args
        .results_dir
        .clone()
        .or(raw.watcher.results_dir)
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| config_error("results-dir is required (--results-dir or RESULTS_DIR)"))?;

    let suites = resolve_suites(args.suites.as_deref(), raw.watcher.suites)?;

    let poll_interval = nonzero_duration(
        "watcher.poll_interval",
        raw.watcher.poll_interval,
        DEFAULT_POLL_INTERVAL,
    )?;

    let timeout = nonzero_duration(
        "dry_run.timeout",
        raw.dry_run.timeout,
        DEFAULT_DRY_RUN_TIMEOUT,
    )?;

    let prefix = raw
        .annotations
        .prefix
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
    validate_prefix(&prefix)?;

    let dry_run = DryRunSettings {
        enabled: !args.skip_dry_run && raw.dry_run.enabled.unwrap_or(true),
        timeout,
        script_dir: args.script_dir.clone().or(raw.dry_run.script_dir),
    };

    Ok(Settings {
        results_dir,
        suites,
        poll_interval,
        percent_mode: args
            .percent_mode
            .or(raw.watcher.percent_mode)
            .unwrap_or_default(),
        publish_policy: raw.watcher.publish.unwrap_or_default(),
        dry_run,
        identity: PodIdentity::new(args.pod_name.clone(), args.pod_namespace.clone()),
        annotation_prefix: prefix,
        log: LogSettings {
            file: args.log_file.clone(),
            stdout: args.stdout,
            verbose: args.verbose,
        },
    })
}

fn resolve_suites(cli: Option<&str>, file: Option<Vec<Suite>>) -> Result<Vec<Suite>> {
    let suites = match (cli, file) {
        (Some(list), _) if !list.trim().is_empty() => {
            parse_suite_list(list).map_err(WatcherError::ConfigError)?
        }
        (_, Some(list)) => list,
        _ => Suite::ALL.to_vec(),
    };

    if suites.is_empty() {
        return Err(config_error("at least one test suite must be configured"));
    }
    Ok(suites)
}

fn nonzero_duration(field: &str, value: Option<Duration>, default: Duration) -> Result<Duration> {
    match value {
        None => Ok(default),
        Some(duration) if duration.is_zero() => {
            Err(config_error(format!("{field} must be greater than zero")))
        }
        Some(duration) => Ok(duration),
    }
}

fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.trim().is_empty() {
        return Err(config_error("annotations.prefix must not be empty"));
    }
    if prefix.contains('/') {
        return Err(config_error(format!(
            "annotations.prefix must not contain '/' (got {prefix:?})"
        )));
    }
    Ok(())
}

fn config_error(msg: impl Into<String>) -> WatcherError {
    WatcherError::ConfigError(msg.into())
}
