// src/progress/detector.rs

use tracing::trace;

use super::ProgressSnapshot;

/// Remembers the last published snapshot.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    previous: Option<ProgressSnapshot>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// `true` when there is no baseline yet or `current` differs from it in
    /// anything other than durations.
    pub fn has_changed(&self, current: &ProgressSnapshot) -> bool {
        match &self.previous {
            None => true,
            Some(previous) => previous != current,
        }
    }

    /// Make `snapshot` the new baseline.
    pub fn commit(&mut self, snapshot: ProgressSnapshot) {
        trace!(
            completed = snapshot.completed,
            total = snapshot.total,
            "committed progress baseline"
        );
        self.previous = Some(snapshot);
    }

    /// Compare and, if changed, adopt `current` as the baseline in one step.
    pub fn observe(&mut self, current: &ProgressSnapshot) -> bool {
        let changed = self.has_changed(current);
        if changed {
            self.commit(current.clone());
        }
        changed
    }

    pub fn baseline(&self) -> Option<&ProgressSnapshot> {
        self.previous.as_ref()
    }
}
