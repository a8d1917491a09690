//! Kubernetes backend for kubetemplate.
//!
//! Resolves arbitrary manifest documents to the API resource that serves
//! them, using a discovery snapshot taken once per factory:
//! - `client` - cluster connection from a kubeconfig
//! - `discovery` - the (group, kind, version) -> resource mapping table
//! - `resolver` - document decoding and the launcher factory
//! - `kubernetes` - bound dynamic resource handles
//! - `launcher` - the `Launch` implementation for one object

pub mod client;
pub mod discovery;
pub mod error;
pub mod kubernetes;
pub mod launcher;
pub mod resolver;

pub use client::ClusterConnection;
pub use discovery::{DiscoveryTable, DiscoveryTableBuilder, ResourceMapping, ResourceScope};
pub use error::{ClientError, DecodeError, LookupError};
pub use kubernetes::{Bind, DynamicBinder, DynamicHandle, ResourceHandle};
pub use launcher::KubeLauncher;
pub use resolver::{LauncherFactory, decode};

pub use kubetemplate_core::{ApplyFailure, RollbackOrder, RunState, Transaction};
