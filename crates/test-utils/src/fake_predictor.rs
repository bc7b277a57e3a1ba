use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use progress_watcher::predict::TotalPredictor;
use progress_watcher::types::{BoxFuture, Suite};

/// A fake predictor that:
/// - answers each suite with a scripted count (`None` when unscripted)
/// - optionally sleeps before answering, to exercise the deadline
/// - records which suites were probed.
#[derive(Debug, Clone, Default)]
pub struct FakePredictor {
    answers: BTreeMap<Suite, Option<u64>>,
    delays: BTreeMap<Suite, Duration>,
    probed: Arc<Mutex<Vec<Suite>>>,
}

impl FakePredictor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, suite: Suite, total: Option<u64>) -> Self {
        self.answers.insert(suite, total);
        self
    }

    pub fn delay(mut self, suite: Suite, delay: Duration) -> Self {
        self.delays.insert(suite, delay);
        self
    }

    /// Suites probed so far, in the order probes started.
    pub fn probed(&self) -> Vec<Suite> {
        self.probed.lock().unwrap().clone()
    }
}

impl TotalPredictor for FakePredictor {
    fn predict(&self, suite: Suite) -> BoxFuture<'_, Option<u64>> {
        Box::pin(async move {
            self.probed.lock().unwrap().push(suite);
            if let Some(delay) = self.delays.get(&suite) {
                tokio::time::sleep(*delay).await;
            }
            self.answers.get(&suite).copied().flatten()
        })
    }
}
