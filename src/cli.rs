// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every option can also be supplied through the environment variable named
//! in its help text, which is how the watcher is usually configured inside a
//! pod.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::PercentMode;

/// Command-line arguments for `progress-watcher`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "progress-watcher",
    version,
    about = "Follow conformance suite logs and publish progress onto the owning Job.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory containing one sub-directory per suite with its log file.
    #[arg(long, env = "RESULTS_DIR", value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Comma-separated list of configured suites.
    ///
    /// Default: compute,network,storage,ssp,tier2
    #[arg(long, env = "TEST_SUITES", value_name = "LIST")]
    pub suites: Option<String>,

    /// Skip dry-run discovery and learn totals from the logs only.
    ///
    /// The environment value accepts the usual spellings (`1`, `yes`,
    /// `true`, `0`, `no`, `false`, ...).
    #[arg(
        long,
        env = "SKIP_DRY_RUN",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub skip_dry_run: bool,

    /// Directory holding the suite runner scripts (used for dry-run).
    #[arg(long, env = "SCRIPT_DIR", value_name = "DIR")]
    pub script_dir: Option<PathBuf>,

    /// Name of the pod this watcher runs in.
    #[arg(long, env = "POD_NAME", value_name = "NAME")]
    pub pod_name: Option<String>,

    /// Namespace of the pod this watcher runs in.
    #[arg(long, env = "POD_NAMESPACE", value_name = "NAMESPACE")]
    pub pod_namespace: Option<String>,

    /// How the overall percentage is computed.
    #[arg(long, value_enum, value_name = "MODE")]
    pub percent_mode: Option<PercentMode>,

    /// Optional TOML settings file.
    #[arg(long, env = "PROGRESS_WATCHER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Progress log file (always written).
    #[arg(
        long,
        env = "PROGRESS_WATCHER_LOG_FILE",
        value_name = "PATH",
        default_value = "/tmp/progress_watcher.log"
    )]
    pub log_file: PathBuf,

    /// Also write progress logs to stdout.
    #[arg(long)]
    pub stdout: bool,

    /// Log every processed line (implies debug level).
    #[arg(long)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `--verbose`, `PROGRESS_WATCHER_LOG` or a default level
    /// will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
