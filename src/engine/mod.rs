// src/engine/mod.rs

//! Monitoring engine for progress-watcher.
//!
//! This module ties together:
//! - suite discovery and log tailing
//! - per-line classification into suite records
//! - aggregation and change detection
//! - the polling loop that publishes progress until shutdown
//!
//! The synchronous monitor state lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::time::Duration;

use crate::types::PublishPolicy;

/// Runtime options used by the polling loop.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Sleep between two cycles.
    pub poll_interval: Duration,
    pub publish_policy: PublishPolicy,
}

/// What one polling cycle did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Suites picked up for the first time this cycle.
    pub new_suites: usize,
    /// Log lines classified this cycle.
    pub lines: usize,
    pub changed: bool,
    pub published: bool,
    pub publish_failed: bool,
}

pub mod core;
pub mod runtime;

pub use core::{Monitor, TrackedSuite};
pub use runtime::Runtime;
