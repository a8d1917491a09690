//! Error types for kubetemplate.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kind::KindDescriptor;
use crate::transaction::RunState;

/// Boxed error used for the underlying cause of a failed decode, lookup or
/// cluster call. Each stage keeps its own concrete error type; the core only
/// needs to carry it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Cluster mutation attempted by a launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Action {
    #[display("create")]
    Create,
    #[display("delete")]
    Delete,
}

#[derive(Debug, Error)]
pub enum Error {
    /// A non-empty document could not be decoded into an object.
    #[error("invalid manifest document:\n{contents}")]
    Manifest {
        contents: String,
        #[source]
        source: BoxError,
    },

    /// The document's kind is not served by the cluster.
    #[error("unable to resolve {kind}")]
    KindResolution {
        kind: KindDescriptor,
        #[source]
        source: BoxError,
    },

    /// A create or delete call against the cluster failed.
    #[error("unable to {action} object {name}")]
    Runtime {
        action: Action,
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("transaction already applied (state: {0})")]
    AlreadyApplied(RunState),
}

impl Error {
    pub fn manifest(contents: &[u8], source: impl Into<BoxError>) -> Self {
        Self::Manifest {
            contents: String::from_utf8_lossy(contents).into_owned(),
            source: source.into(),
        }
    }

    pub fn kind_resolution(kind: KindDescriptor, source: impl Into<BoxError>) -> Self {
        Self::KindResolution {
            kind,
            source: source.into(),
        }
    }

    pub fn runtime(action: Action, name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Runtime {
            action,
            name: name.into(),
            source: source.into(),
        }
    }

    /// The action attempted, for runtime errors.
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::Runtime { action, .. } => Some(*action),
            _ => None,
        }
    }

    /// This error followed by every underlying cause, separated by `: `.
    ///
    /// `Display` only describes the failed step; use this where the cause
    /// has to reach the log, such as compensating deletes that are not
    /// returned to the caller as the primary error.
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            report.push_str(": ");
            report.push_str(&err.to_string());
            cause = err.source();
        }
        report
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_runtime_error_labels_delete() {
        let err = Error::runtime(Action::Delete, "web", "connection refused");
        assert_eq!(err.to_string(), "unable to delete object web");
        assert_eq!(err.action(), Some(Action::Delete));
        assert_eq!(err.source().unwrap().to_string(), "connection refused");
    }

    #[test]
    fn test_report_includes_cause() {
        let err = Error::runtime(Action::Delete, "Namespace/ns", "forbidden: user cannot delete");
        assert_eq!(
            err.report(),
            "unable to delete object Namespace/ns: forbidden: user cannot delete"
        );
    }

    #[test]
    fn test_manifest_error_keeps_contents() {
        let err = Error::manifest(b"kind: [", "unexpected end of stream");
        match &err {
            Error::Manifest { contents, .. } => assert_eq!(contents, "kind: ["),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("kind: ["));
    }

    #[test]
    fn test_kind_resolution_error_names_kind() {
        let kind = KindDescriptor::new("example.com", "v1", "Widget");
        let err = Error::kind_resolution(kind, "no matches for kind");
        assert_eq!(
            err.to_string(),
            "unable to resolve group: example.com version: v1 kind: Widget"
        );
    }
}
