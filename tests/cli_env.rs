use clap::Parser;
use progress_watcher::cli::CliArgs;

fn parse_with_skip(value: &str) -> Result<CliArgs, clap::Error> {
    // Only test in this binary, so nothing else reads the environment
    // concurrently.
    unsafe { std::env::set_var("SKIP_DRY_RUN", value) };
    let parsed = CliArgs::try_parse_from(["progress-watcher", "--results-dir", "/r"]);
    unsafe { std::env::remove_var("SKIP_DRY_RUN") };
    parsed
}

#[test]
fn skip_dry_run_env_accepts_boolish_values() {
    for value in ["1", "yes", "true", "on"] {
        let args = parse_with_skip(value).unwrap_or_else(|e| panic!("{value}: {e}"));
        assert!(args.skip_dry_run, "{value} should skip the dry run");
    }
    for value in ["0", "no", "false", "off"] {
        let args = parse_with_skip(value).unwrap_or_else(|e| panic!("{value}: {e}"));
        assert!(!args.skip_dry_run, "{value} should keep the dry run");
    }

    assert!(parse_with_skip("maybe").is_err());

    let flag = CliArgs::try_parse_from(["progress-watcher", "--skip-dry-run"]).unwrap();
    assert!(flag.skip_dry_run);
}
