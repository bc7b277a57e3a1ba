mod common;

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use common::{init_tracing, with_timeout};
use progress_watcher::fs::mock::MockFileSystem;
use progress_watcher::fs::{FileSystem, RealFileSystem};
use progress_watcher::predict::{
    parse_test_count, predict_totals, resolve_script_dir, run_dry_run, ScriptPredictor,
    TotalPredictor, SCRATCH_DIR_NAME,
};
use progress_watcher::types::Suite;
use progress_watcher_test_utils::FakePredictor;
use tempfile::tempdir;

#[test]
fn parses_ginkgo_dry_run_output() {
    let out = "Running Suite: Compute\nWill run 123 of 456 specs\n\nRan 0 of 456 Specs";
    assert_eq!(parse_test_count(out), Some(123));
}

#[test]
fn parses_pytest_collection() {
    assert_eq!(parse_test_count("==== test session starts ====\ncollected 42 items\n"), Some(42));
    assert_eq!(parse_test_count("collected 1 item"), Some(1));
}

#[test]
fn ginkgo_pattern_beats_generic_on_earlier_line() {
    let out = "found 9 specs in cache\nWill run 4 of 9 specs";
    assert_eq!(parse_test_count(out), Some(4));
}

#[test]
fn generic_fallbacks() {
    assert_eq!(parse_test_count("  15 tests to run"), Some(15));
    assert_eq!(parse_test_count("8 test cases selected"), Some(8));
    assert_eq!(parse_test_count("no tests here"), None);
}

#[test]
fn zero_is_a_prediction() {
    assert_eq!(parse_test_count("Will run 0 of 10 specs"), Some(0));
}

#[tokio::test]
async fn collects_every_probe_within_deadline() {
    init_tracing();
    let predictor = FakePredictor::new()
        .answer(Suite::Compute, Some(100))
        .answer(Suite::Ssp, Some(0))
        .answer(Suite::Tier2, None);

    let totals = with_timeout(predict_totals(
        Arc::new(predictor.clone()),
        &[Suite::Compute, Suite::Ssp, Suite::Tier2],
        Duration::from_secs(2),
    ))
    .await;

    assert_eq!(totals.get(Suite::Compute), Some(100));
    assert_eq!(totals.get(Suite::Ssp), Some(0));
    assert_eq!(totals.get(Suite::Tier2), None);
    assert_eq!(totals.len(), 2);
    assert_eq!(totals.sum(), 100);

    let mut probed = predictor.probed();
    probed.sort();
    assert_eq!(probed, vec![Suite::Compute, Suite::Ssp, Suite::Tier2]);
}

#[tokio::test]
async fn deadline_discards_all_predictions() {
    init_tracing();
    let predictor = FakePredictor::new()
        .answer(Suite::Compute, Some(100))
        .answer(Suite::Network, Some(50))
        .delay(Suite::Network, Duration::from_secs(30));

    let totals = with_timeout(predict_totals(
        Arc::new(predictor),
        &[Suite::Compute, Suite::Network],
        Duration::from_millis(100),
    ))
    .await;

    assert!(totals.is_empty(), "partial predictions must be dropped");
}

#[tokio::test]
async fn dry_run_removes_scratch_directory() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_dir("/results");
    let predictor: Arc<dyn TotalPredictor> =
        Arc::new(FakePredictor::new().answer(Suite::Storage, Some(12)));

    let totals = with_timeout(run_dry_run(
        Arc::new(fs.clone()),
        Path::new("/results"),
        predictor,
        &[Suite::Storage],
        Duration::from_secs(2),
    ))
    .await;

    assert_eq!(totals.get(Suite::Storage), Some(12));
    assert!(!fs.exists(&Path::new("/results").join(SCRATCH_DIR_NAME)));
}

#[tokio::test]
async fn dry_run_removes_scratch_directory_after_timeout() {
    init_tracing();
    let fs = MockFileSystem::new();
    let predictor: Arc<dyn TotalPredictor> = Arc::new(
        FakePredictor::new()
            .answer(Suite::Compute, Some(3))
            .delay(Suite::Compute, Duration::from_secs(30)),
    );

    let totals = with_timeout(run_dry_run(
        Arc::new(fs.clone()),
        Path::new("/results"),
        predictor,
        &[Suite::Compute],
        Duration::from_millis(50),
    ))
    .await;

    assert!(totals.is_empty());
    assert!(!fs.exists(Path::new("/results/.dry-run")));
}

#[test]
fn configured_script_dir_is_used_as_is() {
    let dir = Path::new("/opt/custom/scripts");
    assert_eq!(resolve_script_dir(Some(dir)), Some(dir.to_path_buf()));
}

fn write_script(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[tokio::test]
async fn script_predictor_runs_runner_in_dry_run_mode() {
    init_tracing();
    let scripts = tempdir().unwrap();
    let results = tempdir().unwrap();

    write_script(
        scripts.path(),
        "kubevirt/test-kubevirt.sh",
        r#"#!/bin/bash
if [ "$DRY_RUN" != "true" ] || [ "$DRY_RUN_FLAG" != "--ginkgo.dry-run" ]; then
  echo "not a dry run" >&2
  exit 2
fi
[ -d "$ARTIFACTS" ] || exit 3
case "$SIG" in
  compute) echo "Will run 7 of 9 specs" ;;
  network) echo "Will run 3 of 9 specs" >&2 ; exit 1 ;;
  *) echo "nothing to do" ;;
esac
"#,
    );
    write_script(
        scripts.path(),
        "ssp/test-ssp.sh",
        "#!/bin/bash\necho \"no count here\"\n",
    );

    let scratch = results.path().join(SCRATCH_DIR_NAME);
    let predictor: Arc<dyn TotalPredictor> = Arc::new(ScriptPredictor::new(
        &scratch,
        Some(scripts.path().to_path_buf()),
    ));

    // The runner refuses to start unless its artifacts directory exists,
    // so this also checks that the dry run prepares one per suite.
    let totals = with_timeout(run_dry_run(
        Arc::new(RealFileSystem),
        results.path(),
        predictor,
        &Suite::ALL,
        Duration::from_secs(4),
    ))
    .await;

    assert_eq!(totals.get(Suite::Compute), Some(7));
    // Non-zero exit still parses the combined output.
    assert_eq!(totals.get(Suite::Network), Some(3));
    assert_eq!(totals.get(Suite::Storage), None);
    assert_eq!(totals.get(Suite::Ssp), None);
    // No tier2 runner in this scripts dir.
    assert_eq!(totals.get(Suite::Tier2), None);

    assert!(!scratch.exists(), "scratch directory is removed afterwards");
}

#[tokio::test]
async fn script_predictor_without_scripts_predicts_nothing() {
    init_tracing();
    let results = tempdir().unwrap();
    let predictor = ScriptPredictor::new(results.path().join(SCRATCH_DIR_NAME), None);

    assert_eq!(with_timeout(predictor.predict(Suite::Compute)).await, None);
}
