// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

/// Boxed error used as the `source` of cluster API failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a progress publish attempt failed.
///
/// None of these are fatal: the runtime logs them and tries again on the
/// next cycle.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("{0} is not set; unable to identify the current pod")]
    MissingIdentity(&'static str),

    #[error("failed to create cluster client: {0}")]
    Client(#[source] BoxError),

    #[error("failed to get current pod {namespace}/{name}: {source}")]
    PodLookup {
        namespace: String,
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("pod {namespace}/{pod} is not owned by a Job")]
    NoOwningJob { namespace: String, pod: String },

    #[error("failed to get owning job {namespace}/{name}: {source}")]
    JobLookup {
        namespace: String,
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to update job {namespace}/{name} annotations: {source}")]
    JobUpdate {
        namespace: String,
        name: String,
        #[source]
        source: BoxError,
    },
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatcherError>;
