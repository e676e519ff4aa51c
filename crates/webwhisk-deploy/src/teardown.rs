//! Site teardown.

use webwhisk_platform::{Platform, QualifiedName};

use crate::error::DeployError;

/// Result of a teardown run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    pub site: String,

    /// Actions that were deleted
    pub removed: Vec<String>,
}

/// Delete a published site: every action in its package, then the package.
///
/// Action deletes run concurrently; the package is only deleted once all of
/// them have succeeded.
pub async fn teardown(platform: &dyn Platform, site: &str) -> Result<TeardownReport, DeployError> {
    tracing::info!("Looking up website {}...", site);
    let container = platform.get_container(site).await.map_err(|e| {
        if e.is_not_found() {
            DeployError::SiteNotFound(site.to_string())
        } else {
            DeployError::RemoteCall(e)
        }
    })?;

    let names: Vec<QualifiedName> = container
        .actions
        .iter()
        .map(|unit| QualifiedName::new(site, unit.name.as_str()))
        .collect();

    tracing::info!("Deleting {} actions...", names.len());
    platform.delete_units(&names).await?;

    tracing::info!("Deleting package {}...", site);
    platform.delete_container(site).await?;

    tracing::info!("Website {} deleted.", site);

    Ok(TeardownReport {
        site: site.to_string(),
        removed: container.actions.into_iter().map(|unit| unit.name).collect(),
    })
}
