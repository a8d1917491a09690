//! Kubernetes cluster connection management.

use std::path::Path;

use k8s_openapi::apimachinery::pkg::version::Info;
use kube::{
    Client, Config,
    config::{KubeConfigOptions, Kubeconfig},
};
use tracing::{info, instrument};

use crate::error::ClientError;

/// An authenticated connection to a cluster.
///
/// The one client serves both typed and dynamic API access.
#[derive(Clone)]
pub struct ClusterConnection {
    client: Client,
    server_version: Info,
    /// Human-readable identifier for the cluster (its API server URL).
    cluster_identifier: String,
}

impl std::fmt::Debug for ClusterConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterConnection")
            .field("cluster_identifier", &self.cluster_identifier)
            .field("server_version", &self.server_version)
            .finish_non_exhaustive()
    }
}

impl ClusterConnection {
    /// Connect using a kubeconfig.
    ///
    /// With an explicit `kubeconfig` path that file is used. Otherwise a
    /// `context` selects from the default kubeconfig (`$KUBECONFIG` or
    /// `~/.kube/config`), and with neither the configuration is inferred,
    /// which also covers running inside a cluster.
    #[instrument(skip_all)]
    pub async fn connect(
        kubeconfig: Option<&Path>,
        context: Option<&str>,
    ) -> Result<Self, ClientError> {
        let options = KubeConfigOptions {
            context: context.map(str::to_string),
            ..Default::default()
        };

        let config = match (kubeconfig, context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path)?;
                Config::from_custom_kubeconfig(kubeconfig, &options).await?
            }
            (None, Some(_)) => Config::from_custom_kubeconfig(Kubeconfig::read()?, &options).await?,
            (None, None) => Config::infer().await?,
        };
        let cluster_identifier = config.cluster_url.to_string();

        let client = Client::try_from(config)?;
        let server_version = client.apiserver_version().await?;

        info!(
            cluster = %cluster_identifier,
            version = %server_version.git_version,
            "connected to cluster"
        );

        Ok(Self {
            client,
            server_version,
            cluster_identifier,
        })
    }

    /// Get a reference to the underlying kube client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn server_version(&self) -> &Info {
        &self.server_version
    }

    pub fn cluster_identifier(&self) -> &str {
        &self.cluster_identifier
    }
}
