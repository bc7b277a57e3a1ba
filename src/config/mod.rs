// src/config/mod.rs

//! Configuration loading and validation for the progress watcher.
//!
//! Responsibilities:
//! - Define the TOML-backed settings file and the resolved settings
//!   (`model.rs`).
//! - Load the optional file from disk (`loader.rs`).
//! - Merge it with CLI/env values and validate (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, load_settings};
pub use model::{DryRunSettings, LogSettings, RawConfigFile, Settings};
pub use validate::{resolve_settings, DEFAULT_POLL_INTERVAL};
