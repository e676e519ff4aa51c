//! Remote platform abstraction.

use std::future::Future;
use std::pin::Pin;

use futures::future::try_join_all;

use crate::error::PlatformError;
use crate::types::{ContainerInfo, ExecutableUnit, QualifiedName, UnitInfo};

/// Boxed future returned by [`Platform`] operations.
pub type PlatformFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PlatformError>> + Send + 'a>>;

/// Operations the publish and teardown pipelines need from the platform.
///
/// Implementations must tolerate concurrent calls through a shared reference.
pub trait Platform: Send + Sync {
    /// Create the container, or update it if it already exists.
    fn put_container<'a>(&'a self, name: &'a str) -> PlatformFuture<'a, ContainerInfo>;

    /// Fetch a container and its member list.
    fn get_container<'a>(&'a self, name: &'a str) -> PlatformFuture<'a, ContainerInfo>;

    /// Delete an (empty) container.
    fn delete_container<'a>(&'a self, name: &'a str) -> PlatformFuture<'a, ()>;

    /// Create the unit, or overwrite it if it already exists.
    fn put_unit<'a>(&'a self, unit: &'a ExecutableUnit) -> PlatformFuture<'a, UnitInfo>;

    /// Delete a single unit.
    fn delete_unit<'a>(&'a self, name: &'a QualifiedName) -> PlatformFuture<'a, ()>;

    /// Delete several units concurrently, stopping at the first failure.
    fn delete_units<'a>(&'a self, names: &'a [QualifiedName]) -> PlatformFuture<'a, ()> {
        Box::pin(async move {
            try_join_all(names.iter().map(|name| self.delete_unit(name))).await?;
            Ok(())
        })
    }

    /// Base URL public web action URLs are built from.
    fn web_base(&self) -> &str;
}
