//! Launcher for one unstructured object.

use async_trait::async_trait;
use kube::ResourceExt;
use kube::api::DynamicObject;
use kubetemplate_core::{Action, Error, Launch, Result};
use tracing::{info, warn};

use crate::kubernetes::ResourceHandle;

/// Pairs one object with the handle that can create and delete it.
pub struct KubeLauncher<H> {
    object: DynamicObject,
    handle: H,
    echo: bool,
    created_name: Option<String>,
}

impl<H: ResourceHandle> KubeLauncher<H> {
    pub fn new(object: DynamicObject, handle: H) -> Self {
        Self {
            object,
            handle,
            echo: false,
            created_name: None,
        }
    }

    /// Print each object to stdout before it is created or deleted.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn object(&self) -> &DynamicObject {
        &self.object
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn kind(&self) -> &str {
        self.object
            .types
            .as_ref()
            .map(|t| t.kind.as_str())
            .unwrap_or_default()
    }

    /// Name to delete: the server-assigned name once created, so objects
    /// using `generateName` can still be rolled back.
    fn delete_name(&self) -> Option<String> {
        self.created_name
            .clone()
            .or_else(|| self.object.metadata.name.clone())
    }

    fn report(&self, action: &str) {
        if !self.echo {
            return;
        }
        match serde_json::to_string_pretty(&self.object) {
            Ok(pretty) => println!("{action}: \n{pretty}\n"),
            Err(e) => warn!(object = %self.display_name(), error = %e, "failed to print object"),
        }
    }
}

#[async_trait]
impl<H: ResourceHandle> Launch for KubeLauncher<H> {
    fn display_name(&self) -> String {
        let name = self.created_name.clone().unwrap_or_else(|| self.object.name_any());
        format!("{}/{}", self.kind(), name)
    }

    async fn create(&mut self) -> Result<()> {
        self.report("creating");
        info!(
            object = %self.display_name(),
            resource = %self.handle.resource().plural,
            namespace = self.handle.namespace().unwrap_or_default(),
            "creating object"
        );

        let created = self
            .handle
            .create(&self.object)
            .await
            .map_err(|e| Error::runtime(Action::Create, self.display_name(), e))?;
        self.created_name = created.metadata.name;
        Ok(())
    }

    async fn delete(&mut self) -> Result<()> {
        self.report("deleting");
        info!(
            object = %self.display_name(),
            resource = %self.handle.resource().plural,
            namespace = self.handle.namespace().unwrap_or_default(),
            "deleting object"
        );

        let name = self.delete_name().ok_or_else(|| {
            Error::runtime(Action::Delete, self.display_name(), "object has no name")
        })?;
        self.handle
            .delete(&name)
            .await
            .map_err(|e| Error::runtime(Action::Delete, self.display_name(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::discovery::ApiResource;
    use kube::core::GroupVersionKind;
    use kubetemplate_core::BoxError;
    use std::sync::Mutex;

    struct MockHandle {
        resource: ApiResource,
        fail: bool,
        deleted: Mutex<Vec<String>>,
    }

    impl MockHandle {
        fn new(fail: bool) -> Self {
            Self {
                resource: ApiResource::from_gvk_with_plural(
                    &GroupVersionKind::gvk("", "v1", "Pod"),
                    "pods",
                ),
                fail,
                deleted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ResourceHandle for MockHandle {
        fn resource(&self) -> &ApiResource {
            &self.resource
        }

        fn namespace(&self) -> Option<&str> {
            Some("default")
        }

        async fn create(&self, object: &DynamicObject) -> std::result::Result<DynamicObject, BoxError> {
            if self.fail {
                return Err("pods \"web\" already exists".into());
            }
            let mut created = object.clone();
            if created.metadata.name.is_none() {
                let prefix = created.metadata.generate_name.clone().unwrap_or_default();
                created.metadata.name = Some(format!("{prefix}x7k2p"));
            }
            Ok(created)
        }

        async fn delete(&self, name: &str) -> std::result::Result<(), BoxError> {
            if self.fail {
                return Err("forbidden".into());
            }
            self.deleted.lock().unwrap().push(name.to_string());
            Ok(())
        }
    }

    fn pod(name: Option<&str>, generate_name: Option<&str>) -> DynamicObject {
        let mut object: DynamicObject = serde_json::from_value(serde_json::json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {},
        }))
        .unwrap();
        object.metadata.name = name.map(str::to_string);
        object.metadata.generate_name = generate_name.map(str::to_string);
        object
    }

    #[tokio::test]
    async fn test_create_then_delete() {
        let mut launcher = KubeLauncher::new(pod(Some("web"), None), MockHandle::new(false));
        assert_eq!(launcher.display_name(), "Pod/web");

        launcher.create().await.unwrap();
        launcher.delete().await.unwrap();

        assert_eq!(*launcher.handle().deleted.lock().unwrap(), vec!["web"]);
    }

    #[tokio::test]
    async fn test_generated_name_is_deleted() {
        let mut launcher = KubeLauncher::new(pod(None, Some("job-")), MockHandle::new(false));

        launcher.create().await.unwrap();
        assert_eq!(launcher.display_name(), "Pod/job-x7k2p");
        launcher.delete().await.unwrap();

        assert_eq!(*launcher.handle().deleted.lock().unwrap(), vec!["job-x7k2p"]);
    }

    #[tokio::test]
    async fn test_create_failure_is_runtime_error() {
        let mut launcher = KubeLauncher::new(pod(Some("web"), None), MockHandle::new(true));

        let err = launcher.create().await.unwrap_err();
        match err {
            Error::Runtime { action, name, .. } => {
                assert_eq!(action, Action::Create);
                assert_eq!(name, "Pod/web");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_failure_is_labelled_delete() {
        let mut launcher = KubeLauncher::new(pod(Some("web"), None), MockHandle::new(true));

        let err = launcher.delete().await.unwrap_err();
        assert_eq!(err.action(), Some(Action::Delete));
        assert_eq!(err.to_string(), "unable to delete object Pod/web");
    }

    #[tokio::test]
    async fn test_delete_without_name() {
        let mut launcher = KubeLauncher::new(pod(None, Some("job-")), MockHandle::new(false));

        let err = launcher.delete().await.unwrap_err();
        assert_eq!(err.action(), Some(Action::Delete));
        assert!(launcher.handle().deleted.lock().unwrap().is_empty());
    }
}
