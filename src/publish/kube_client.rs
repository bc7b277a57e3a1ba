// src/publish/kube_client.rs

use std::collections::BTreeMap;

use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, Patch, PatchParams};
use kube::Client;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::errors::PublishError;
use crate::publish::cluster::{ClusterClient, JobInfo, OwnerReference, PodInfo};
use crate::types::BoxFuture;

/// [`ClusterClient`] over the Kubernetes API.
///
/// The underlying client is built on first use from the usual sources
/// (`KUBECONFIG`, `~/.kube/config`, then in-cluster service account). If that
/// fails the error is returned and construction is retried on the next call.
#[derive(Default)]
pub struct KubeClusterClient {
    client: OnceCell<Client>,
}

impl std::fmt::Debug for KubeClusterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeClusterClient")
            .field("initialised", &self.client.initialized())
            .finish()
    }
}

impl KubeClusterClient {
    pub fn new() -> Self {
        Self {
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<Client, PublishError> {
        self.client
            .get_or_try_init(|| async {
                let client = Client::try_default()
                    .await
                    .map_err(|e| PublishError::Client(Box::new(e)))?;
                debug!("kubernetes client initialised");
                Ok::<_, PublishError>(client)
            })
            .await
            .cloned()
    }
}

impl ClusterClient for KubeClusterClient {
    fn get_pod<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<PodInfo, PublishError>> {
        Box::pin(async move {
            let pods: Api<Pod> = Api::namespaced(self.client().await?, namespace);
            let pod = pods.get(name).await.map_err(|e| PublishError::PodLookup {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source: Box::new(e),
            })?;

            let owner_references = pod
                .metadata
                .owner_references
                .unwrap_or_default()
                .into_iter()
                .map(|r| OwnerReference::new(r.api_version, r.kind, r.name))
                .collect();

            Ok(PodInfo {
                namespace: pod.metadata.namespace.unwrap_or_else(|| namespace.to_string()),
                name: pod.metadata.name.unwrap_or_else(|| name.to_string()),
                owner_references,
            })
        })
    }

    fn get_job<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<JobInfo, PublishError>> {
        Box::pin(async move {
            let jobs: Api<Job> = Api::namespaced(self.client().await?, namespace);
            let job = jobs.get(name).await.map_err(|e| PublishError::JobLookup {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source: Box::new(e),
            })?;

            Ok(JobInfo {
                namespace: namespace.to_string(),
                name: job.metadata.name.unwrap_or_else(|| name.to_string()),
                annotations: job.metadata.annotations.unwrap_or_default(),
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
            let jobs: Api<Job> = Api::namespaced(self.client().await?, namespace);
            let patch = json!({ "metadata": { "annotations": annotations } });
            jobs.patch(name, &PatchParams::default(), &Patch::Merge(&patch))
                .await
                .map_err(|e| PublishError::JobUpdate {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    source: Box::new(e),
                })?;
            Ok(())
        })
    }
}
