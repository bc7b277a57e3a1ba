mod common;

use common::{init_tracing, t0};
use progress_watcher::classify::Classifier;
use progress_watcher::track::SuiteRecord;
use progress_watcher::types::Suite;
use progress_watcher_test_utils::SuiteRecordBuilder;

fn feed(record: &mut SuiteRecord, lines: &[&str]) {
    let classifier = Classifier::standard();
    for line in lines {
        classifier.classify(record, line, t0());
    }
}

#[test]
fn ginkgo_spec_line_counts_a_pass() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Compute)
        .total(10)
        .completed(5)
        .passed(5)
        .build();

    feed(&mut record, &["• test passed"]);

    assert_eq!(record.completed, 6);
    assert_eq!(record.passed, 6);
    assert_eq!(record.failed, 0);
    assert!(!record.finished);
}

#[test]
fn ginkgo_spec_line_with_failed_marker_counts_a_failure() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Compute)
        .total(10)
        .completed(5)
        .passed(5)
        .build();

    feed(&mut record, &["• test [FAILED]"]);

    assert_eq!(record.completed, 6);
    assert_eq!(record.passed, 5);
    assert_eq!(record.failed, 1);
}

#[test]
fn declared_total_is_set_once_and_never_overwritten() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Network).build();

    feed(&mut record, &["Will run 50 of 100 specs"]);
    assert_eq!(record.total, 50);

    feed(&mut record, &["Will run 42 of 100 specs"]);
    assert_eq!(record.total, 50, "known total must not be overwritten");
}

#[test]
fn predicted_total_wins_over_declared_total() {
    init_tracing();
    let mut record = SuiteRecord::new(Suite::Storage, "/r/storage/storage-log.txt", Some(30), t0());

    feed(&mut record, &["Will run 25 of 40 specs"]);

    assert_eq!(record.total, 30);
}

#[test]
fn late_declared_total_below_completed_finishes_the_suite() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Compute).build();

    feed(
        &mut record,
        &["• ok", "• ok", "• ok", "• ok", "• ok", "Will run 3 of 9 specs"],
    );

    assert_eq!(record.total, 3);
    assert_eq!(record.completed, 5);
    assert!(record.finished);
    assert_eq!(record.percent(), 100);
}

#[test]
fn pytest_collected_line_sets_total() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Tier2).build();

    feed(&mut record, &["collected 25 items"]);

    assert_eq!(record.total, 25);
}

#[test]
fn declared_total_line_is_not_classified_further() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Compute).build();

    // Also starts with the spec marker; the total rule stops processing.
    feed(&mut record, &["• Will run 3 of 3 specs"]);

    assert_eq!(record.total, 3);
    assert_eq!(record.completed, 0);
}

#[test]
fn pytest_result_lines_count_by_status() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Tier2).total(5).build();

    feed(
        &mut record,
        &[
            "TEST: test_vm_boot PASSED",
            "TEST: test_vm_migrate FAILED",
            "TEST: test_vm_snapshot PASSED",
            "TEST: test_vm_pending",
        ],
    );

    assert_eq!(record.completed, 3);
    assert_eq!(record.passed, 2);
    assert_eq!(record.failed, 1);
}

#[test]
fn reaching_total_finishes_the_suite() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Ssp).total(2).build();

    feed(&mut record, &["• spec one", "• spec two"]);

    assert!(record.finished);
    assert_eq!(record.end_time, Some(t0()));
    assert_eq!(record.percent(), 100);
}

#[test]
fn lines_after_finish_do_not_count() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Ssp).total(1).build();

    feed(&mut record, &["• spec one", "• spec two", "TEST: extra PASSED"]);

    assert!(record.finished);
    assert_eq!(record.completed, 1);
    assert_eq!(record.passed, 1);
}

#[test]
fn ginkgo_ran_line_finishes_the_suite() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Compute).total(10).completed(4).build();

    feed(&mut record, &["Ran 4 of 10 Specs in 12.345 seconds"]);

    assert!(record.finished);
    assert_eq!(record.total, 10);
    assert_eq!(record.percent(), 100);
}

#[test]
fn finish_marker_needs_a_qualifier() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Compute).total(10).build();

    feed(&mut record, &["Ran into a transient error"]);

    assert!(!record.finished);
}

#[test]
fn finish_with_unknown_total_adopts_completed() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Network).build();

    feed(
        &mut record,
        &["• spec a", "• spec b [FAILED]", "• spec c", "3 tests completed"],
    );

    assert!(record.finished);
    assert_eq!(record.total, 3);
    assert_eq!(record.completed, 3);
}

#[test]
fn summary_line_overwrites_tallies() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Tier2)
        .total(20)
        .completed(10)
        .passed(9)
        .failed(1)
        .build();

    feed(&mut record, &["progress: 12 passed, 3 failed so far"]);

    assert_eq!(record.passed, 12);
    assert_eq!(record.failed, 3);
    assert_eq!(record.completed, 10, "summary does not touch completed");
    assert!(!record.finished);
}

#[test]
fn finishing_summary_line_still_applies_its_counts() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Tier2)
        .total(20)
        .completed(18)
        .passed(17)
        .failed(1)
        .build();

    feed(
        &mut record,
        &["=========== short test summary info: 16 passed, 2 failed ==========="],
    );

    assert!(record.finished);
    assert_eq!(record.passed, 16);
    assert_eq!(record.failed, 2);

    feed(&mut record, &["later: 1 passed, 1 failed"]);
    assert_eq!(record.passed, 16, "finished suites are frozen");
    assert_eq!(record.failed, 2);
}

#[test]
fn oversized_summary_counts_do_not_overflow() {
    init_tracing();
    let mut record = SuiteRecordBuilder::new(Suite::Tier2).total(10).completed(2).build();

    feed(&mut record, &["18446744073709551615 passed, 1 failed"]);

    assert_eq!(record.passed, u64::MAX);
    assert_eq!(record.failed, 1);
    assert!(record.percent() <= 100);
}

#[test]
fn standard_rules_are_ordered() {
    let names: Vec<_> = Classifier::standard().rule_names().collect();
    assert_eq!(
        names,
        vec![
            "declared-total",
            "declared-total",
            "finish-marker",
            "ginkgo-spec",
            "pytest-result",
            "summary-counts",
        ]
    );
}
