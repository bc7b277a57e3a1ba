// src/main.rs

use progress_watcher::{cli, config, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("progress-watcher error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let settings = config::load_settings(&args)?;
    logging::init_logging(&settings.log, args.log_level)?;
    run(settings).await
}
