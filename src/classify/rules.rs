// src/classify/rules.rs

//! The built-in line rules, one per thing a log line can tell us.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::classify::patterns::{
    capture_count, FINISH_MARKERS, FINISH_QUALIFIERS, GINKGO_FAILED_MARKER, GINKGO_SPEC_MARKER,
    GINKGO_TOTAL, PYTEST_TEST_PREFIX, PYTEST_TOTAL, SUMMARY_FAILED, SUMMARY_PASSED,
};
use crate::classify::{Flow, LineContext, LineRule};
use crate::track::{SuiteRecord, TestOutcome};

/// Picks up the declared test count (`Will run N of M specs`,
/// `collected N items`).
///
/// Sets the total only while it is still unknown, finishing the suite if
/// that many tests already ran. Once known, a differing count is reported
/// but never applied. A matching line is not looked at by
/// any later rule.
#[derive(Debug)]
pub struct DeclaredTotalRule {
    runner: &'static str,
    pattern: &'static LazyLock<Regex>,
}

impl DeclaredTotalRule {
    pub fn ginkgo() -> Self {
        Self {
            runner: "ginkgo",
            pattern: &GINKGO_TOTAL,
        }
    }

    pub fn pytest() -> Self {
        Self {
            runner: "pytest",
            pattern: &PYTEST_TOTAL,
        }
    }
}

impl LineRule for DeclaredTotalRule {
    fn name(&self) -> &'static str {
        "declared-total"
    }

    fn apply(&self, record: &mut SuiteRecord, ctx: &mut LineContext<'_>) -> Flow {
        let Some(detected) = capture_count(self.pattern, ctx.line) else {
            return Flow::Continue;
        };

        if record.total == 0 {
            record.total = detected;
            info!(suite = %record.suite, runner = self.runner, total = detected, "detected total tests");
            if detected < record.completed {
                warn!(
                    suite = %record.suite,
                    runner = self.runner,
                    detected,
                    completed = record.completed,
                    "detected total is below tests already completed"
                );
            }
            if record.finish_if_complete(ctx.now) {
                ctx.finished_on_line = true;
            }
        } else if detected != record.total {
            warn!(
                suite = %record.suite,
                runner = self.runner,
                detected,
                expected = record.total,
                "detected total differs from pre-discovered total"
            );
        }
        Flow::Stop
    }
}

/// Finishes the suite on a summary line (a finish marker plus a qualifying
/// word), or when the completed count has reached the total.
#[derive(Debug, Default)]
pub struct FinishMarkerRule;

impl LineRule for FinishMarkerRule {
    fn name(&self) -> &'static str {
        "finish-marker"
    }

    fn apply(&self, record: &mut SuiteRecord, ctx: &mut LineContext<'_>) -> Flow {
        if record.finished {
            return Flow::Continue;
        }

        let qualified = FINISH_QUALIFIERS.iter().any(|q| ctx.line.contains(q));
        if qualified {
            if let Some(marker) = FINISH_MARKERS.iter().find(|m| ctx.line.contains(*m)) {
                debug!(suite = %record.suite, marker, line = ctx.line, "finish marker matched");
                if record.mark_finished(ctx.now, "summary line") {
                    ctx.finished_on_line = true;
                }
            }
        }

        if record.finish_if_complete(ctx.now) {
            ctx.finished_on_line = true;
        }
        Flow::Continue
    }
}

/// Ginkgo prints one `•` line per finished spec; `[FAILED]` on the same
/// line marks a failure.
#[derive(Debug, Default)]
pub struct GinkgoSpecRule;

impl LineRule for GinkgoSpecRule {
    fn name(&self) -> &'static str {
        "ginkgo-spec"
    }

    fn apply(&self, record: &mut SuiteRecord, ctx: &mut LineContext<'_>) -> Flow {
        if !ctx.line.starts_with(GINKGO_SPEC_MARKER) {
            return Flow::Continue;
        }
        if record.finished {
            debug!(suite = %record.suite, line = ctx.line, "suite already finished; ignoring spec line");
            return Flow::Continue;
        }

        let outcome = if ctx.line.contains(GINKGO_FAILED_MARKER) {
            TestOutcome::Failed
        } else {
            TestOutcome::Passed
        };
        debug!(suite = %record.suite, ?outcome, "ginkgo spec line");
        record.record_completion(outcome, ctx.now);
        if record.finished {
            ctx.finished_on_line = true;
        }
        Flow::Continue
    }
}

/// Per-test `TEST: <name> PASSED|FAILED` lines from the pytest wrapper.
#[derive(Debug, Default)]
pub struct PytestResultRule;

impl LineRule for PytestResultRule {
    fn name(&self) -> &'static str {
        "pytest-result"
    }

    fn apply(&self, record: &mut SuiteRecord, ctx: &mut LineContext<'_>) -> Flow {
        if record.finished || !ctx.line.starts_with(PYTEST_TEST_PREFIX) {
            return Flow::Continue;
        }

        let outcome = if ctx.line.contains("PASSED") {
            TestOutcome::Passed
        } else if ctx.line.contains("FAILED") {
            TestOutcome::Failed
        } else {
            return Flow::Continue;
        };
        record.record_completion(outcome, ctx.now);
        if record.finished {
            ctx.finished_on_line = true;
        }
        Flow::Continue
    }
}

/// `N passed, M failed` summaries overwrite the per-line tallies.
///
/// Applies while the suite is running, and to the very line that finished
/// it; later lines cannot touch a finished suite.
#[derive(Debug, Default)]
pub struct SummaryCountsRule;

impl LineRule for SummaryCountsRule {
    fn name(&self) -> &'static str {
        "summary-counts"
    }

    fn apply(&self, record: &mut SuiteRecord, ctx: &mut LineContext<'_>) -> Flow {
        if record.finished && !ctx.finished_on_line {
            return Flow::Continue;
        }
        if !(ctx.line.contains("passed") && ctx.line.contains("failed")) {
            return Flow::Continue;
        }

        let passed = capture_count(&SUMMARY_PASSED, ctx.line);
        let failed = capture_count(&SUMMARY_FAILED, ctx.line);
        record.apply_summary(passed, failed);
        Flow::Continue
    }
}
