//! The `Launch` trait.

use async_trait::async_trait;

use crate::Result;

/// One resource that can be created on, and deleted from, a cluster.
///
/// A launcher exclusively owns the object it launches. Failed calls are
/// reported as [`crate::Error::Runtime`] labelled with the attempted action.
#[async_trait]
pub trait Launch: Send {
    /// Identity shown in progress output and errors.
    fn display_name(&self) -> String;

    /// Create the resource.
    async fn create(&mut self) -> Result<()>;

    /// Delete the resource, cascading to its dependents in the foreground.
    async fn delete(&mut self) -> Result<()>;
}
