use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use progress_watcher::errors::PublishError;
use progress_watcher::publish::{ClusterClient, JobInfo, OwnerReference, PodInfo};
use progress_watcher::types::BoxFuture;

#[derive(Debug, Default)]
struct ClusterState {
    pods: BTreeMap<(String, String), PodInfo>,
    jobs: BTreeMap<(String, String), JobInfo>,
    fail_updates: bool,
    /// Every merge request, in order: (namespace, job, annotations).
    merges: Vec<(String, String, BTreeMap<String, String>)>,
}

/// In-memory cluster that:
/// - serves pods and jobs registered by the test
/// - applies annotation merges to the stored job
/// - records every merge so tests can inspect what was written.
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<ClusterState>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pod owned by `batch/v1` Job `job`, and the job itself.
    pub fn with_job_pod(self, namespace: &str, pod: &str, job: &str) -> Self {
        self.add_pod(
            namespace,
            pod,
            vec![OwnerReference::new("batch/v1", "Job", job)],
        );
        self.add_job(namespace, job);
        self
    }

    pub fn add_pod(&self, namespace: &str, name: &str, owners: Vec<OwnerReference>) {
        let pod = PodInfo {
            namespace: namespace.to_string(),
            name: name.to_string(),
            owner_references: owners,
        };
        self.state
            .lock()
            .unwrap()
            .pods
            .insert((namespace.to_string(), name.to_string()), pod);
    }

    pub fn add_job(&self, namespace: &str, name: &str) {
        let job = JobInfo {
            namespace: namespace.to_string(),
            name: name.to_string(),
            annotations: BTreeMap::new(),
        };
        self.state
            .lock()
            .unwrap()
            .jobs
            .insert((namespace.to_string(), name.to_string()), job);
    }

    /// Make every subsequent annotation update fail.
    pub fn set_fail_updates(&self, fail: bool) {
        self.state.lock().unwrap().fail_updates = fail;
    }

    pub fn job_annotations(&self, namespace: &str, name: &str) -> BTreeMap<String, String> {
        self.state
            .lock()
            .unwrap()
            .jobs
            .get(&(namespace.to_string(), name.to_string()))
            .map(|j| j.annotations.clone())
            .unwrap_or_default()
    }

    pub fn merges(&self) -> Vec<(String, String, BTreeMap<String, String>)> {
        self.state.lock().unwrap().merges.clone()
    }

    pub fn merge_count(&self) -> usize {
        self.state.lock().unwrap().merges.len()
    }
}

fn not_found(what: &str, namespace: &str, name: &str) -> Box<dyn std::error::Error + Send + Sync> {
    format!("{what} {namespace}/{name} not found").into()
}

impl ClusterClient for FakeCluster {
    fn get_pod<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<PodInfo, PublishError>> {
        Box::pin(async move {
            self.state
                .lock()
                .unwrap()
                .pods
                .get(&(namespace.to_string(), name.to_string()))
                .cloned()
                .ok_or_else(|| PublishError::PodLookup {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    source: not_found("pod", namespace, name),
                })
        })
    }

    fn get_job<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<JobInfo, PublishError>> {
        Box::pin(async move {
            self.state
                .lock()
                .unwrap()
                .jobs
                .get(&(namespace.to_string(), name.to_string()))
                .cloned()
                .ok_or_else(|| PublishError::JobLookup {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    source: not_found("job", namespace, name),
                })
        })
    }

    fn merge_job_annotations<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
        annotations: &'a BTreeMap<String, String>,
    ) -> BoxFuture<'a, Result<(), PublishError>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if state.fail_updates {
                return Err(PublishError::JobUpdate {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    source: "injected update failure".into(),
                });
            }

            let key = (namespace.to_string(), name.to_string());
            let Some(job) = state.jobs.get_mut(&key) else {
                return Err(PublishError::JobUpdate {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    source: not_found("job", namespace, name),
                });
            };
            job.annotations
                .extend(annotations.iter().map(|(k, v)| (k.clone(), v.clone())));
            state
                .merges
                .push((namespace.to_string(), name.to_string(), annotations.clone()));
            Ok(())
        })
    }
}
