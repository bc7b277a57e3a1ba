// src/publish/mod.rs

//! Publishing progress onto the owning Job.
//!
//! - [`cluster`] defines the orchestration capability ([`ClusterClient`]).
//! - [`kube_client`] implements it against the Kubernetes API.
//! - [`annotations`] renders a [`ProgressSnapshot`] as key/value pairs.
//!
//! The runtime talks to a [`ProgressPublisher`]; [`JobAnnotationPublisher`]
//! is the production implementation.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::PublishError;
use crate::progress::ProgressSnapshot;
use crate::types::BoxFuture;

pub mod annotations;
pub mod cluster;
pub mod kube_client;

pub use annotations::{build_annotations, DEFAULT_PREFIX};
pub use cluster::{ClusterClient, JobInfo, OwnerReference, PodInfo};
pub use kube_client::KubeClusterClient;

/// Where progress goes at the end of a cycle.
pub trait ProgressPublisher: Send {
    /// Publish `snapshot`. `changed` tells whether it differs from the last
    /// successfully published one.
    fn publish<'a>(
        &'a mut self,
        snapshot: &'a ProgressSnapshot,
        changed: bool,
        now: DateTime<Utc>,
    ) -> BoxFuture<'a, Result<(), PublishError>>;
}

/// Identity of the pod this process runs in (downward API values).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodIdentity {
    pub name: Option<String>,
    pub namespace: Option<String>,
}

impl PodIdentity {
    pub fn new(name: Option<String>, namespace: Option<String>) -> Self {
        Self { name, namespace }
    }

    fn require(&self) -> Result<(&str, &str), PublishError> {
        let name = self
            .name
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(PublishError::MissingIdentity("POD_NAME"))?;
        let namespace = self
            .namespace
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(PublishError::MissingIdentity("POD_NAMESPACE"))?;
        Ok((name, namespace))
    }
}

/// Writes progress as annotations on the Job that owns this pod.
///
/// Ownership is re-resolved on every publish (pod → owner references → Job)
/// so a transient lookup failure only costs one cycle.
#[derive(Debug)]
pub struct JobAnnotationPublisher<C: ClusterClient> {
    client: C,
    identity: PodIdentity,
    prefix: String,
}

impl<C: ClusterClient> JobAnnotationPublisher<C> {
    pub fn new(client: C, identity: PodIdentity, prefix: impl Into<String>) -> Self {
        Self {
            client,
            identity,
            prefix: prefix.into(),
        }
    }

    /// Resolve the Job owning the current pod.
    pub async fn resolve_owning_job(&self) -> Result<JobInfo, PublishError> {
        let (pod_name, namespace) = self.identity.require()?;
        let pod = self.client.get_pod(namespace, pod_name).await?;

        let owner = pod.owning_job().ok_or_else(|| PublishError::NoOwningJob {
            namespace: pod.namespace.clone(),
            pod: pod.name.clone(),
        })?;

        self.client.get_job(&pod.namespace, &owner.name).await
    }
}

impl<C: ClusterClient> ProgressPublisher for JobAnnotationPublisher<C> {
    fn publish<'a>(
        &'a mut self,
        snapshot: &'a ProgressSnapshot,
        changed: bool,
        now: DateTime<Utc>,
    ) -> BoxFuture<'a, Result<(), PublishError>> {
        Box::pin(async move {
            let job = self.resolve_owning_job().await?;
            let annotations = build_annotations(&self.prefix, snapshot, changed, now);
            self.client
                .merge_job_annotations(&job.namespace, &job.name, &annotations)
                .await?;

            info!(
                job = %format!("{}/{}", job.namespace, job.name),
                completed = snapshot.completed,
                total = snapshot.total,
                percent = snapshot.percent,
                "updated job annotations"
            );
            Ok(())
        })
    }
}
