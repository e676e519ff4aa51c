//! Remove a website.

use anyhow::Result;
use webwhisk_deploy::teardown;
use webwhisk_platform::OpenWhiskClient;

use crate::config::ProjectConfig;

/// Run the delete command.
pub async fn run(site: &str, project: &ProjectConfig) -> Result<()> {
    let client = OpenWhiskClient::new(&project.platform_config()?)?;

    let report = teardown(&client, site).await?;
    for name in &report.removed {
        tracing::debug!("Removed {}/{}", report.site, name);
    }
    tracing::info!("Removed {} files of website {}", report.removed.len(), report.site);

    Ok(())
}
