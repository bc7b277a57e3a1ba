mod common;

use common::t0;
use progress_watcher::classify::Classifier;
use progress_watcher::predict::PredictedTotals;
use progress_watcher::progress::{aggregate, ChangeDetector};
use progress_watcher::track::SuiteRecord;
use progress_watcher::types::{PercentMode, Suite};
use proptest::prelude::*;
use progress_watcher_test_utils::SuiteRecordBuilder;

/// Lines a suite log realistically contains.
fn log_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("• spec".to_string()),
        Just("• spec [FAILED]".to_string()),
        Just("TEST: test_x PASSED".to_string()),
        Just("TEST: test_x FAILED".to_string()),
        (1u64..50).prop_map(|n| format!("Will run {n} of 60 specs")),
        (1u64..50).prop_map(|n| format!("collected {n} items")),
        (0u64..20, 0u64..20).prop_map(|(p, f)| format!("{p} passed, {f} failed")),
        Just("Ran 10 of 60 Specs in 3.2 seconds".to_string()),
        Just("random noise".to_string()),
    ]
}

fn suite() -> impl Strategy<Value = Suite> {
    prop::sample::select(Suite::ALL.to_vec())
}

fn record() -> impl Strategy<Value = SuiteRecord> {
    (suite(), 0u64..200, 0u64..200, any::<bool>()).prop_map(|(suite, total, done, finished)| {
        let completed = if total > 0 { done % (total + 1) } else { done };
        let mut b = SuiteRecordBuilder::new(suite).total(total).completed(completed);
        if finished {
            b = b.finished();
        }
        b.build()
    })
}

proptest! {
    #[test]
    fn counters_never_shrink_and_finish_is_sticky(lines in prop::collection::vec(log_line(), 0..60)) {
        let classifier = Classifier::standard();
        let mut record = SuiteRecordBuilder::new(Suite::Compute).build();
        let mut was_finished = false;
        let mut completed = 0;
        let mut total = 0;

        for line in &lines {
            classifier.classify(&mut record, line, t0());

            prop_assert!(record.completed >= completed);
            prop_assert!(!was_finished || record.finished);
            if total > 0 {
                prop_assert_eq!(record.total, total, "a known total never changes");
            }
            if was_finished {
                prop_assert_eq!(record.completed, completed, "finished suites are frozen");
            }

            was_finished = record.finished;
            completed = record.completed;
            total = record.total;
        }
    }

    #[test]
    fn finished_suites_report_full_percent(lines in prop::collection::vec(log_line(), 0..60)) {
        let classifier = Classifier::standard();
        let mut record = SuiteRecordBuilder::new(Suite::Tier2).build();
        for line in &lines {
            classifier.classify(&mut record, line, t0());
        }

        if record.finished {
            prop_assert_eq!(record.percent(), 100);
            prop_assert!(record.end_time.is_some());
        } else {
            prop_assert!(record.percent() <= 100);
        }
    }

    #[test]
    fn overall_percent_is_bounded(records in prop::collection::vec(record(), 0..5), per_suite in any::<bool>()) {
        // One record per suite, as the monitor guarantees.
        let mut unique: Vec<SuiteRecord> = Vec::new();
        for r in records {
            if !unique.iter().any(|u| u.suite == r.suite) {
                unique.push(r);
            }
        }
        let mode = if per_suite { PercentMode::PerSuite } else { PercentMode::Weighted };
        let snapshot = aggregate(&unique, &PredictedTotals::new(), &Suite::ALL, mode, t0());

        prop_assert!(snapshot.percent <= 100);
        prop_assert_eq!(snapshot.active_suites, unique.len());
        prop_assert_eq!(snapshot.completed, unique.iter().map(|r| r.completed).sum::<u64>());
    }

    #[test]
    fn identical_records_never_change_twice(records in prop::collection::vec(record(), 0..5), later in 0i64..10_000) {
        let mut detector = ChangeDetector::new();
        let first = aggregate(&records, &PredictedTotals::new(), &Suite::ALL, PercentMode::Weighted, t0());
        prop_assert!(detector.observe(&first));

        let again = aggregate(
            &records,
            &PredictedTotals::new(),
            &Suite::ALL,
            PercentMode::Weighted,
            t0() + chrono::Duration::seconds(later),
        );
        prop_assert!(!detector.observe(&again));
    }
}
