// src/track/mod.rs

//! Per-suite bookkeeping.
//!
//! - [`record`] holds the mutable counters for one suite (`SuiteRecord`).
//! - [`discovery`] finds which suites currently have a log file on disk.
//! - [`tailer`] keeps a resumable read cursor into one append-only log.

pub mod discovery;
pub mod record;
pub mod tailer;

pub use discovery::{discover_suites, IGNORED_ENTRIES};
pub use record::{SuiteRecord, TestOutcome};
pub use tailer::LogTail;
