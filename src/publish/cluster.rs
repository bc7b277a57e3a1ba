// src/publish/cluster.rs

//! The slice of the orchestration API the publisher needs.

use std::collections::BTreeMap;

use crate::errors::PublishError;
use crate::types::BoxFuture;

/// Owner kind/version the progress annotations are written to.
pub const OWNER_KIND: &str = "Job";
pub const OWNER_API_VERSION: &str = "batch/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
}

impl OwnerReference {
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn is_job(&self) -> bool {
        self.kind == OWNER_KIND && self.api_version == OWNER_API_VERSION
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodInfo {
    pub namespace: String,
    pub name: String,
    pub owner_references: Vec<OwnerReference>,
}

impl PodInfo {
    /// First owner reference pointing at a `batch/v1` Job.
    pub fn owning_job(&self) -> Option<&OwnerReference> {
        self.owner_references.iter().find(|r| r.is_job())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    pub namespace: String,
    pub name: String,
    pub annotations: BTreeMap<String, String>,
}

/// Opaque orchestration client capability.
///
/// The production implementation talks to the Kubernetes API
/// ([`super::kube_client::KubeClusterClient`]); tests use an in-memory fake.
pub trait ClusterClient: Send + Sync {
    fn get_pod<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<PodInfo, PublishError>>;

    fn get_job<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<JobInfo, PublishError>>;

    /// Merge `annotations` into the job's existing annotations.
    fn merge_job_annotations<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
        annotations: &'a BTreeMap<String, String>,
    ) -> BoxFuture<'a, Result<(), PublishError>>;
}
