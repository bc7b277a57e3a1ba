// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, Settings};
use crate::config::validate::resolve_settings;
use crate::errors::Result;

/// Load a settings file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** merge with the
/// command line or validate anything. Use [`load_settings`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Build the effective [`Settings`] for a run.
///
/// - Reads the TOML file named by `--config`, if any.
/// - Overlays command-line flags and environment variables.
/// - Applies defaults and checks that required values are present.
pub fn load_settings(args: &CliArgs) -> Result<Settings> {
    let raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => RawConfigFile::default(),
    };
    resolve_settings(raw, args)
}
