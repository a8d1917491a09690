//! Resolution of manifest documents to bound launchers.

use kube::api::DynamicObject;
use kubetemplate_core::{Error, KindDescriptor, Result, split_documents};
use serde_json::Value;
use tracing::debug;

use crate::client::ClusterConnection;
use crate::discovery::DiscoveryTable;
use crate::error::{ClientError, DecodeError};
use crate::kubernetes::{Bind, DynamicBinder};
use crate::launcher::KubeLauncher;

/// Namespace given to namespaced objects that do not set one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Decode one YAML or JSON document into an object and its kind.
pub fn decode(document: &[u8]) -> std::result::Result<(DynamicObject, KindDescriptor), DecodeError> {
    let mut yaml: serde_yaml::Value = serde_yaml::from_slice(document)?;
    yaml.apply_merge()?;
    let value = serde_json::to_value(yaml)?;
    let Value::Object(fields) = &value else {
        return Err(DecodeError::NotAMapping);
    };

    let api_version = non_empty_str(fields.get("apiVersion"))
        .ok_or(DecodeError::MissingField("apiVersion"))?;
    let kind = non_empty_str(fields.get("kind")).ok_or(DecodeError::MissingField("kind"))?;
    let descriptor = KindDescriptor::from_api_version(api_version, kind);

    let object: DynamicObject = serde_json::from_value(value)?;
    Ok((object, descriptor))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Builds launchers for manifest documents against one discovery snapshot.
///
/// Resolution never calls the cluster; the snapshot is the only source of
/// truth for which resource serves a kind. Building a fresh snapshot requires
/// a new factory.
pub struct LauncherFactory<B> {
    table: DiscoveryTable,
    binder: B,
    echo: bool,
}

impl LauncherFactory<DynamicBinder> {
    /// Run discovery against the connected cluster and build a factory on it.
    pub async fn connect(connection: &ClusterConnection) -> std::result::Result<Self, ClientError> {
        let table = DiscoveryTable::discover(connection.client()).await?;
        Ok(Self::new(table, DynamicBinder::new(connection.client().clone())))
    }
}

impl<B: Bind> LauncherFactory<B> {
    pub fn new(table: DiscoveryTable, binder: B) -> Self {
        Self {
            table,
            binder,
            echo: false,
        }
    }

    /// Print objects to stdout as they are created or deleted.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn table(&self) -> &DiscoveryTable {
        &self.table
    }

    /// Resolve every document in a multi-document manifest, in order.
    ///
    /// Fails on the first document that does not resolve.
    pub fn launchers(&self, manifest: &[u8]) -> Result<Vec<KubeLauncher<B::Handle>>> {
        split_documents(manifest)
            .into_iter()
            .map(|document| self.resolve(document))
            .collect()
    }

    /// Resolve one document to a launcher bound to the resource serving it.
    ///
    /// Namespaced objects without a namespace are placed in `default`.
    pub fn resolve(&self, document: &[u8]) -> Result<KubeLauncher<B::Handle>> {
        let (mut object, kind) = decode(document).map_err(|e| Error::manifest(document, e))?;

        let mapping = self
            .table
            .lookup(&kind)
            .map_err(|e| Error::kind_resolution(kind.clone(), e))?;

        let handle = if mapping.is_namespaced() {
            let namespace = object
                .metadata
                .namespace
                .get_or_insert_with(String::new);
            if namespace.is_empty() {
                *namespace = DEFAULT_NAMESPACE.to_string();
            }
            self.binder.bind(&mapping.resource, Some(namespace.as_str()))
        } else {
            self.binder.bind(&mapping.resource, None)
        };

        debug!(
            kind = %kind.kind,
            api_version = %kind.api_version(),
            resource = %mapping.resource.plural,
            namespace = object.metadata.namespace.as_deref().unwrap_or_default(),
            "resolved document"
        );

        Ok(KubeLauncher::new(object, handle).with_echo(self.echo))
    }
}
