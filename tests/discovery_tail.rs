mod common;

use std::path::Path;

use common::{append, init_tracing, suite_log};
use progress_watcher::fs::mock::MockFileSystem;
use progress_watcher::fs::RealFileSystem;
use progress_watcher::track::{discover_suites, LogTail};
use progress_watcher::types::Suite;
use tempfile::tempdir;

#[test]
fn discovers_only_suites_with_logs() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/results/tier2/tier2-log.txt", "");
    fs.add_file("/results/compute/compute-log.txt", "");
    fs.add_dir("/results/network"); // no log yet
    fs.add_dir("/results/lost+found");
    fs.add_dir("/results/.dry-run/compute");
    fs.add_file("/results/.dry-run/compute/compute-log.txt", "");
    fs.add_dir("/results/unrelated");
    fs.add_file("/results/ssp", "a file, not a suite dir");

    let found = discover_suites(&fs, Path::new("/results"));

    let suites: Vec<Suite> = found.iter().map(|(s, _)| *s).collect();
    assert_eq!(suites, vec![Suite::Compute, Suite::Tier2]);
    assert_eq!(
        found[0].1,
        Path::new("/results/compute/compute-log.txt").to_path_buf()
    );
}

#[test]
fn missing_results_dir_yields_nothing() {
    init_tracing();
    let fs = MockFileSystem::new();
    assert!(discover_suites(&fs, Path::new("/nowhere")).is_empty());
}

#[test]
fn late_log_is_picked_up_on_a_later_call() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_dir("/results/storage");
    assert!(discover_suites(&fs, Path::new("/results")).is_empty());

    fs.add_file("/results/storage/storage-log.txt", "");
    let found = discover_suites(&fs, Path::new("/results"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0, Suite::Storage);
}

#[test]
fn tail_tolerates_missing_file_then_reads_appends() {
    init_tracing();
    let fs = MockFileSystem::new();
    let path = Path::new("/results/ssp/ssp-log.txt");
    let mut tail = LogTail::new(path);

    assert!(tail.read_new_lines(&fs).unwrap().is_empty());
    assert!(!tail.is_open());

    fs.add_file(path, "first\nsecond  \n");
    assert_eq!(tail.read_new_lines(&fs).unwrap(), vec!["first", "second"]);
    assert!(tail.is_open());
    assert!(tail.read_new_lines(&fs).unwrap().is_empty());

    fs.append(path, b"third\n");
    assert_eq!(tail.read_new_lines(&fs).unwrap(), vec!["third"]);
    assert_eq!(tail.offset(), "first\nsecond  \nthird\n".len() as u64);

    assert!(tail.close());
    assert!(!tail.close());
}

#[test]
fn tail_holds_partial_lines_until_complete() {
    init_tracing();
    let dir = tempdir().unwrap();
    let path = suite_log(dir.path(), Suite::Compute);
    append(&path, "• spec one\n• spec tw");

    let fs = RealFileSystem;
    let mut tail = LogTail::new(&path);

    assert_eq!(tail.read_new_lines(&fs).unwrap(), vec!["• spec one"]);

    append(&path, "o\r\n");
    assert_eq!(tail.read_new_lines(&fs).unwrap(), vec!["• spec two"]);
}

#[test]
fn tail_replaces_invalid_utf8() {
    init_tracing();
    let fs = MockFileSystem::new();
    let path = Path::new("/results/tier2/tier2-log.txt");
    fs.add_file(path, b"ok \xff\n".to_vec());

    let mut tail = LogTail::new(path);
    let lines = tail.read_new_lines(&fs).unwrap();

    assert_eq!(lines, vec!["ok \u{FFFD}"]);
}
