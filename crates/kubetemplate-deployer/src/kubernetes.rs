//! Bound dynamic resource handles.

use async_trait::async_trait;
use kube::{
    Client,
    api::{Api, DeleteParams, DynamicObject, PostParams},
    discovery::ApiResource,
};
use kubetemplate_core::BoxError;

/// A client bound to exactly one resource type and, for namespaced
/// resources, exactly one namespace.
#[async_trait]
pub trait ResourceHandle: Send + Sync {
    /// The resource type this handle targets.
    fn resource(&self) -> &ApiResource;

    /// The bound namespace, `None` for cluster-scoped resources.
    fn namespace(&self) -> Option<&str>;

    /// Create `object`, returning the object as stored by the server.
    async fn create(&self, object: &DynamicObject) -> Result<DynamicObject, BoxError>;

    /// Delete the named object with foreground cascading.
    async fn delete(&self, name: &str) -> Result<(), BoxError>;
}

/// Produces handles for resolved resources.
pub trait Bind {
    type Handle: ResourceHandle;

    fn bind(&self, resource: &ApiResource, namespace: Option<&str>) -> Self::Handle;
}

/// Handle backed by the kube dynamic API.
#[derive(Clone)]
pub struct DynamicHandle {
    api: Api<DynamicObject>,
    resource: ApiResource,
    namespace: Option<String>,
}

impl DynamicHandle {
    pub fn new(client: Client, resource: &ApiResource, namespace: Option<&str>) -> Self {
        let api = match namespace {
            Some(ns) => Api::namespaced_with(client, ns, resource),
            None => Api::all_with(client, resource),
        };
        Self {
            api,
            resource: resource.clone(),
            namespace: namespace.map(str::to_string),
        }
    }
}

#[async_trait]
impl ResourceHandle for DynamicHandle {
    fn resource(&self) -> &ApiResource {
        &self.resource
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    async fn create(&self, object: &DynamicObject) -> Result<DynamicObject, BoxError> {
        Ok(self.api.create(&PostParams::default(), object).await?)
    }

    async fn delete(&self, name: &str) -> Result<(), BoxError> {
        self.api.delete(name, &DeleteParams::foreground()).await?;
        Ok(())
    }
}

/// Binds handles through a shared kube client.
#[derive(Clone)]
pub struct DynamicBinder {
    client: Client,
}

impl DynamicBinder {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Bind for DynamicBinder {
    type Handle = DynamicHandle;

    fn bind(&self, resource: &ApiResource, namespace: Option<&str>) -> DynamicHandle {
        DynamicHandle::new(self.client.clone(), resource, namespace)
    }
}
