// src/classify/mod.rs

//! Per-line progress classification.
//!
//! A [`Classifier`] is an ordered list of [`LineRule`]s. Each log line is
//! offered to every rule in turn until one returns [`Flow::Stop`]; rules
//! mutate the suite's [`SuiteRecord`] directly. Supporting another runner
//! output style means adding rules, not editing the existing ones.
//!
//! Per suite the record moves through:
//! unknown total → total known → running → finished.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::track::SuiteRecord;

pub mod patterns;
pub mod rules;

pub use rules::{
    DeclaredTotalRule, FinishMarkerRule, GinkgoSpecRule, PytestResultRule, SummaryCountsRule,
};

/// Whether later rules should still see the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// The line being classified plus state shared between rules for that line.
#[derive(Debug)]
pub struct LineContext<'a> {
    pub line: &'a str,
    pub now: DateTime<Utc>,
    /// Set by whichever rule finished the suite on this line.
    pub finished_on_line: bool,
}

/// One pattern → action step.
pub trait LineRule: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;
    fn apply(&self, record: &mut SuiteRecord, ctx: &mut LineContext<'_>) -> Flow;
}

#[derive(Debug)]
pub struct Classifier {
    rules: Vec<Box<dyn LineRule>>,
}

impl Classifier {
    pub fn new(rules: Vec<Box<dyn LineRule>>) -> Self {
        Self { rules }
    }

    /// Rules for the Ginkgo and pytest output styles, in priority order.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(DeclaredTotalRule::ginkgo()),
            Box::new(DeclaredTotalRule::pytest()),
            Box::new(FinishMarkerRule),
            Box::new(GinkgoSpecRule),
            Box::new(PytestResultRule),
            Box::new(SummaryCountsRule),
        ])
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name())
    }

    /// Feed one (already trimmed) log line into `record`.
    pub fn classify(&self, record: &mut SuiteRecord, line: &str, now: DateTime<Utc>) {
        let mut ctx = LineContext {
            line,
            now,
            finished_on_line: false,
        };
        for rule in &self.rules {
            if rule.apply(record, &mut ctx) == Flow::Stop {
                break;
            }
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}
