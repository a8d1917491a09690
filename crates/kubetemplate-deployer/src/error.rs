//! Errors raised while connecting, discovering and resolving.

use kube::config::{InferConfigError, KubeconfigError};
use thiserror::Error;

/// Errors connecting to a cluster or reading its discovery data.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to load kubeconfig")]
    Kubeconfig(#[from] KubeconfigError),

    #[error("failed to infer cluster configuration")]
    Infer(#[from] InferConfigError),

    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error("API discovery failed")]
    Discovery(#[source] kube::Error),
}

/// Errors decoding one manifest document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid YAML")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document is not a mapping")]
    NotAMapping,

    #[error("Object '{0}' is missing")]
    MissingField(&'static str),

    #[error("invalid object")]
    Object(#[from] serde_json::Error),
}

/// Errors looking a kind up in the discovery table.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no matches for kind {kind:?} in group {group:?}")]
    UnknownKind { group: String, kind: String },

    #[error("version {version:?} is not served (available: {})", .served.join(", "))]
    UnservedVersion { version: String, served: Vec<String> },
}
