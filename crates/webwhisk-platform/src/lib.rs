//! Remote platform access for webwhisk.
//!
//! Defines the [`Platform`] operations the publish pipeline relies on, an
//! OpenWhisk implementation over its REST API, and an in-memory
//! implementation for dry runs.

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod openwhisk;
pub mod types;

pub use client::{Platform, PlatformFuture};
pub use config::{PlatformConfig, WskProps};
pub use error::PlatformError;
pub use memory::{CallEvent, MemoryPlatform, PlatformCall};
pub use openwhisk::OpenWhiskClient;
pub use types::{
    Annotation, ContainerInfo, ExecutableUnit, QualifiedName, ResponseHeaders, UnitExec, UnitInfo,
    UnitRef, WebResponse, WEB_EXPORT_ANNOTATION,
};
