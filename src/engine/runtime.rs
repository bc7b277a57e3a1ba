// src/engine/runtime.rs

use std::fmt;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::publish::ProgressPublisher;
use crate::types::PublishPolicy;

use super::core::Monitor;
use super::{CycleReport, RuntimeOptions};

/// Drives the [`Monitor`] on a fixed interval and hands snapshots to a
/// [`ProgressPublisher`].
///
/// This is the async shell around `Monitor`: it owns the clock, the sleep
/// between cycles and the shutdown token, and performs the publish call.
pub struct Runtime<P: ProgressPublisher> {
    monitor: Monitor,
    publisher: P,
    options: RuntimeOptions,
    shutdown: CancellationToken,
}

impl<P: ProgressPublisher> fmt::Debug for Runtime<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("monitor", &self.monitor)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<P: ProgressPublisher> Runtime<P> {
    pub fn new(
        monitor: Monitor,
        publisher: P,
        options: RuntimeOptions,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            monitor,
            publisher,
            options,
            shutdown,
        }
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// Main polling loop.
    ///
    /// - Checks the shutdown token at the top of every cycle.
    /// - Runs one [`Runtime::tick`].
    /// - Sleeps for the poll interval, waking early on shutdown.
    ///
    /// Returns the monitor once the token is cancelled, with every log
    /// handle released.
    pub async fn run(mut self) -> Monitor {
        info!(
            results_dir = ?self.monitor.results_dir(),
            poll_interval = %humantime::format_duration(self.options.poll_interval),
            "progress watcher started"
        );

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            self.tick(Utc::now()).await;

            tokio::select! {
                _ = tokio::time::sleep(self.options.poll_interval) => {}
                _ = self.shutdown.cancelled() => {}
            }
        }

        let released = self.monitor.close();
        info!(released, "shutdown requested; closed suite logs");
        self.monitor
    }

    /// One cycle: discover → read → aggregate → publish.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> CycleReport {
        let new_suites = self.monitor.discover(now);
        let lines = self.monitor.drain(now);
        let (snapshot, changed) = self.monitor.evaluate(now);

        debug!(
            new_suites,
            lines,
            completed = snapshot.completed,
            total = snapshot.total,
            percent = snapshot.percent,
            active_suites = snapshot.active_suites,
            changed,
            "cycle complete"
        );

        let mut report = CycleReport {
            new_suites,
            lines,
            changed,
            ..CycleReport::default()
        };

        let should_publish = changed || self.options.publish_policy == PublishPolicy::EveryCycle;
        if !should_publish {
            return report;
        }

        match self.publisher.publish(&snapshot, changed, now).await {
            Ok(()) => {
                report.published = true;
                if changed {
                    self.monitor.commit(snapshot);
                }
            }
            Err(err) => {
                report.publish_failed = true;
                warn!(error = %err, "failed to publish progress; retrying next cycle");
            }
        }

        report
    }
}
