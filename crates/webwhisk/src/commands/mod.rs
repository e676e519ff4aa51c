pub mod delete;
pub mod init;
pub mod upload;
pub mod wizard;

use anyhow::Result;

use crate::config::ProjectConfig;
use crate::request::SiteRequest;

/// Flags that only affect how a request is carried out.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Open the published site in the browser
    pub open: bool,
    /// Publish to an in-memory platform instead of OpenWhisk
    pub dry_run: bool,
}

/// Carry out an upload or delete request.
pub async fn execute(request: SiteRequest, project: &ProjectConfig, options: RunOptions) -> Result<()> {
    tracing::debug!("Resolved request for website {}", request.site());

    match request {
        SiteRequest::Upload { site, path, entry } => {
            upload::run(site, path, entry, project, options).await
        }
        SiteRequest::Delete { site } => delete::run(&site, project).await,
    }
}
