//! Kind descriptors.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The (group, version, kind) triple identifying a resource schema.
///
/// The core API group is represented by an empty `group`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("group: {group} version: {version} kind: {kind}")]
pub struct KindDescriptor {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl KindDescriptor {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Build a descriptor from a document's `apiVersion` and `kind` fields.
    ///
    /// `apiVersion` is either `group/version` or a bare `version` for the
    /// core group.
    pub fn from_api_version(api_version: &str, kind: impl Into<String>) -> Self {
        let (group, version) = match api_version.split_once('/') {
            Some((group, version)) => (group, version),
            None => ("", api_version),
        };
        Self::new(group, version, kind)
    }

    /// The `apiVersion` string for this descriptor.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    pub fn is_core_group(&self) -> bool {
        self.group.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_api_version() {
        let kind = KindDescriptor::from_api_version("apps/v1", "Deployment");
        assert_eq!(kind.group, "apps");
        assert_eq!(kind.version, "v1");
        assert_eq!(kind.kind, "Deployment");
        assert_eq!(kind.api_version(), "apps/v1");
        assert!(!kind.is_core_group());
    }

    #[test]
    fn test_core_api_version() {
        let kind = KindDescriptor::from_api_version("v1", "ConfigMap");
        assert_eq!(kind.group, "");
        assert_eq!(kind.version, "v1");
        assert_eq!(kind.api_version(), "v1");
        assert!(kind.is_core_group());
    }

    #[test]
    fn test_display() {
        let kind = KindDescriptor::new("rbac.authorization.k8s.io", "v1", "ClusterRole");
        assert_eq!(
            kind.to_string(),
            "group: rbac.authorization.k8s.io version: v1 kind: ClusterRole"
        );
    }
}
