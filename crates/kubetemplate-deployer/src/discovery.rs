//! API resource discovery.
//!
//! The cluster's discovery API is queried once and flattened into a
//! [`DiscoveryTable`] answering "which resource serves this (group, kind) at
//! this version, and is it namespaced". The table is read-only once built.

use std::collections::{BTreeMap, HashMap};

use kube::{
    Client, Discovery,
    core::GroupVersionKind,
    discovery::{ApiResource, Scope},
};
use kubetemplate_core::KindDescriptor;
use tracing::{debug, instrument};

use crate::error::{ClientError, LookupError};

/// Kubernetes API resource scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceScope {
    /// Resource is namespaced (e.g., Deployment, ConfigMap).
    Namespaced,

    /// Resource is cluster-wide (e.g., Namespace, ClusterRole).
    ClusterWide,
}

impl From<&Scope> for ResourceScope {
    fn from(scope: &Scope) -> Self {
        match scope {
            Scope::Namespaced => ResourceScope::Namespaced,
            Scope::Cluster => ResourceScope::ClusterWide,
        }
    }
}

/// The resource serving one (group, version, kind).
#[derive(Debug, Clone)]
pub struct ResourceMapping {
    pub resource: ApiResource,
    pub scope: ResourceScope,
}

impl ResourceMapping {
    pub fn is_namespaced(&self) -> bool {
        self.scope == ResourceScope::Namespaced
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKind {
    group: String,
    kind: String,
}

/// Snapshot of every resource kind the cluster served at discovery time,
/// indexed by (group, kind) and then version.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryTable {
    mappings: HashMap<GroupKind, BTreeMap<String, ResourceMapping>>,
}

impl DiscoveryTable {
    pub fn builder() -> DiscoveryTableBuilder {
        DiscoveryTableBuilder::new()
    }

    /// Query the cluster's discovery API and build the table.
    #[instrument(skip(client))]
    pub async fn discover(client: &Client) -> Result<Self, ClientError> {
        let discovery = Discovery::new(client.clone())
            .run()
            .await
            .map_err(ClientError::Discovery)?;
        let table = Self::from_discovery(&discovery);
        debug!(kinds = table.len(), "discovered API resources");
        Ok(table)
    }

    /// Build the table from a completed discovery.
    pub fn from_discovery(discovery: &Discovery) -> Self {
        let mut builder = DiscoveryTableBuilder::new();
        for group in discovery.groups() {
            // Every served version, not only the preferred one, so manifests
            // pinned to an older version still resolve.
            for version in group.versions() {
                for (resource, caps) in group.versioned_resources(version) {
                    builder = builder.insert(resource, ResourceScope::from(&caps.scope));
                }
            }
        }
        builder.build()
    }

    /// Find the resource serving `kind`.
    pub fn lookup(&self, kind: &KindDescriptor) -> Result<&ResourceMapping, LookupError> {
        let key = GroupKind {
            group: kind.group.clone(),
            kind: kind.kind.clone(),
        };
        let versions = self
            .mappings
            .get(&key)
            .ok_or_else(|| LookupError::UnknownKind {
                group: kind.group.clone(),
                kind: kind.kind.clone(),
            })?;

        versions
            .get(&kind.version)
            .ok_or_else(|| LookupError::UnservedVersion {
                version: kind.version.clone(),
                served: versions.keys().cloned().collect(),
            })
    }

    /// Number of distinct (group, version, kind) entries.
    pub fn len(&self) -> usize {
        self.mappings.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Builder for creating DiscoveryTable.
pub struct DiscoveryTableBuilder {
    table: DiscoveryTable,
}

impl DiscoveryTableBuilder {
    pub fn new() -> Self {
        Self {
            table: DiscoveryTable::default(),
        }
    }

    pub fn insert(mut self, resource: ApiResource, scope: ResourceScope) -> Self {
        let key = GroupKind {
            group: resource.group.clone(),
            kind: resource.kind.clone(),
        };
        self.table
            .mappings
            .entry(key)
            .or_default()
            .insert(resource.version.clone(), ResourceMapping { resource, scope });
        self
    }

    pub fn namespaced(self, group: &str, version: &str, kind: &str, plural: &str) -> Self {
        self.insert(api_resource(group, version, kind, plural), ResourceScope::Namespaced)
    }

    pub fn cluster_wide(self, group: &str, version: &str, kind: &str, plural: &str) -> Self {
        self.insert(api_resource(group, version, kind, plural), ResourceScope::ClusterWide)
    }

    pub fn build(self) -> DiscoveryTable {
        self.table
    }
}

impl Default for DiscoveryTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn api_resource(group: &str, version: &str, kind: &str, plural: &str) -> ApiResource {
    ApiResource::from_gvk_with_plural(&GroupVersionKind::gvk(group, version, kind), plural)
}
