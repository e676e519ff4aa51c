//! Upload a website.

use std::path::PathBuf;

use anyhow::Result;
use webwhisk_deploy::{PublishConfig, Publisher};
use webwhisk_platform::config::DEFAULT_NAMESPACE;
use webwhisk_platform::{MemoryPlatform, OpenWhiskClient, PlatformConfig};

use super::RunOptions;
use crate::config::ProjectConfig;

/// Run the upload command.
pub async fn run(
    site: String,
    path: PathBuf,
    entry: String,
    project: &ProjectConfig,
    options: RunOptions,
) -> Result<()> {
    tracing::info!("Uploading website {} from {}", site, path.display());

    let platform_config = project.platform_config()?;

    let mut config = PublishConfig::new(site, path).with_entry(entry);
    if let Some(kind) = &project.platform.kind {
        config = config.with_kind(kind.as_str());
    }
    let publisher = Publisher::new(config);

    let report = if options.dry_run {
        tracing::info!("Dry run, nothing will be sent to the platform");
        publisher.publish(&dry_run_platform(&platform_config)).await?
    } else {
        let client = OpenWhiskClient::new(&platform_config)?;
        publisher.publish(&client).await?
    };

    tracing::info!(
        "Published {} files ({} references rewritten) in {}ms",
        report.units,
        report.rewritten,
        report.duration_ms
    );
    tracing::info!("Your website is available at {}", report.url);

    if options.open && !options.dry_run {
        if let Err(e) = open::that(&report.url) {
            tracing::warn!("Could not open browser: {}", e);
        }
    }

    Ok(())
}

/// In-memory stand-in that reports the URLs the real platform would.
fn dry_run_platform(config: &PlatformConfig) -> MemoryPlatform {
    let platform = MemoryPlatform::new().with_web_base(config.web_base.as_str());
    if config.namespace == DEFAULT_NAMESPACE {
        platform
    } else {
        platform.with_namespace(config.namespace.as_str())
    }
}
