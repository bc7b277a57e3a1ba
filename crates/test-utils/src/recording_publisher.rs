use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use progress_watcher::errors::PublishError;
use progress_watcher::progress::ProgressSnapshot;
use progress_watcher::publish::ProgressPublisher;
use progress_watcher::types::BoxFuture;

/// One call made to a [`RecordingPublisher`].
#[derive(Debug, Clone)]
pub struct PublishCall {
    pub snapshot: ProgressSnapshot,
    pub changed: bool,
    pub now: DateTime<Utc>,
}

/// Publisher that stores every snapshot it is handed.
///
/// Clones share the recorded calls and the failure switch, so a test can
/// keep one handle while the runtime owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    calls: Arc<Mutex<Vec<PublishCall>>>,
    fail: Arc<Mutex<bool>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every publish is recorded and then fails.
    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<PublishCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl ProgressPublisher for RecordingPublisher {
    fn publish<'a>(
        &'a mut self,
        snapshot: &'a ProgressSnapshot,
        changed: bool,
        now: DateTime<Utc>,
    ) -> BoxFuture<'a, Result<(), PublishError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(PublishCall {
                snapshot: snapshot.clone(),
                changed,
                now,
            });
            if *self.fail.lock().unwrap() {
                return Err(PublishError::MissingIdentity("POD_NAME"));
            }
            Ok(())
        })
    }
}
