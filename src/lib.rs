// src/lib.rs

pub mod classify;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod predict;
pub mod progress;
pub mod publish;
pub mod track;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Settings;
use crate::engine::{Monitor, Runtime, RuntimeOptions};
use crate::fs::{FileSystem, RealFileSystem};
use crate::predict::{
    resolve_script_dir, run_dry_run, PredictedTotals, ScriptPredictor, TotalPredictor,
    SCRATCH_DIR_NAME,
};
use crate::publish::{JobAnnotationPublisher, KubeClusterClient};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - SIGINT / SIGTERM handling
/// - dry-run total prediction (unless disabled)
/// - the monitor and its polling runtime
/// - the Job annotation publisher
///
/// Returns once a termination signal has been handled.
pub async fn run(settings: Settings) -> Result<()> {
    let shutdown = CancellationToken::new();
    spawn_signal_listener(shutdown.clone());

    info!(
        results_dir = ?settings.results_dir,
        suites = ?settings.suites,
        percent_mode = ?settings.percent_mode,
        publish = ?settings.publish_policy,
        "starting progress watcher"
    );

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let predicted = if settings.dry_run.enabled {
        let script_dir = resolve_script_dir(settings.dry_run.script_dir.as_deref());
        if script_dir.is_none() {
            warn!("scripts directory not found; dry-run cannot predict totals");
        }
        let predictor: Arc<dyn TotalPredictor> = Arc::new(ScriptPredictor::new(
            settings.results_dir.join(SCRATCH_DIR_NAME),
            script_dir,
        ));

        tokio::select! {
            totals = run_dry_run(
                Arc::clone(&fs),
                &settings.results_dir,
                predictor,
                &settings.suites,
                settings.dry_run.timeout,
            ) => totals,
            _ = shutdown.cancelled() => {
                info!("shutdown requested during dry-run discovery");
                return Ok(());
            }
        }
    } else {
        info!("dry-run discovery skipped; totals will be learned from the logs");
        PredictedTotals::new()
    };

    let monitor = Monitor::new(
        fs,
        settings.results_dir.clone(),
        settings.suites.clone(),
        predicted,
    )
    .with_percent_mode(settings.percent_mode)
    .with_verbose(settings.log.verbose);

    let publisher = JobAnnotationPublisher::new(
        KubeClusterClient::new(),
        settings.identity.clone(),
        settings.annotation_prefix.clone(),
    );

    let options = RuntimeOptions {
        poll_interval: settings.poll_interval,
        publish_policy: settings.publish_policy,
    };

    Runtime::new(monitor, publisher, options, shutdown).run().await;
    Ok(())
}

/// Cancel `token` on Ctrl-C or SIGTERM.
fn spawn_signal_listener(token: CancellationToken) {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("received termination signal");
        token.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            warn!(error = %err, "failed to listen for SIGTERM; only Ctrl+C will stop the watcher");
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
            return;
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                warn!(error = %err, "failed to listen for Ctrl+C");
                terminate.recv().await;
            }
        }
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
