// src/logging/mod.rs

//! Logging setup for `progress-watcher` using `tracing` + `tracing-subscriber`.
//!
//! Progress logs always go to a log file and, with `--stdout`, to stdout as
//! well. Each destination is wrapped in its own [`DedupWriter`] so a quiet
//! poll loop does not flood it with identical lines.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `--verbose` (debug)
//! 3. `PROGRESS_WATCHER_LOG` environment variable (e.g. "info", "debug")
//! 4. default to `info`

use std::fs::OpenOptions;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, time::ChronoLocal};
use tracing_subscriber::prelude::*;

use crate::cli::LogLevel;
use crate::config::LogSettings;

mod dedup;

pub use dedup::DedupWriter;

/// Second-resolution timestamps: repeats within the same second collapse.
const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(settings: &LogSettings, cli_level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(cli_level, settings.verbose);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.file)
        .with_context(|| format!("failed to open log file {:?}", settings.file))?;

    let file_layer = fmt::layer()
        .with_writer(DedupWriter::new(file))
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_ansi(false)
        .with_target(false);

    let stdout_layer = settings.stdout.then(|| {
        fmt::layer()
            .with_writer(DedupWriter::new(std::io::stdout()))
            .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}

fn resolve_level(cli_level: Option<LogLevel>, verbose: bool) -> tracing::Level {
    match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None if verbose => tracing::Level::DEBUG,
        None => std::env::var("PROGRESS_WATCHER_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::INFO),
    }
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
