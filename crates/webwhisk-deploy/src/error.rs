//! Pipeline errors.

use std::path::PathBuf;

use webwhisk_platform::PlatformError;
use webwhisk_site::SiteError;

/// Errors that stop a publish or teardown run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error("There is no {entry} in {}", dir.display())]
    MissingEntry { entry: String, dir: PathBuf },

    #[error(transparent)]
    RemoteCall(#[from] PlatformError),

    #[error("Website {0} does not exist")]
    SiteNotFound(String),

    #[error("Failed to package {name}: {message}")]
    Package { name: String, message: String },
}
