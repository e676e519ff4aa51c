//! Site publishing.

use std::path::PathBuf;
use std::time::Instant;

use futures::future::try_join_all;

use webwhisk_platform::{Platform, UnitInfo};
use webwhisk_site::{discover, load, rewrite_manifest, Manifest};

use crate::error::DeployError;
use crate::packager::{Packager, DEFAULT_KIND};

/// Entry page used when none is configured.
pub const DEFAULT_ENTRY: &str = "index.html";

/// Configuration for publishing a site.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Website name, used as the package name
    pub site: String,

    /// Directory holding the site files
    pub root: PathBuf,

    /// Entry page the public URL points at
    pub entry: String,

    /// Runtime kind of the generated actions
    pub kind: String,
}

impl PublishConfig {
    pub fn new(site: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            site: site.into(),
            root: root.into(),
            entry: DEFAULT_ENTRY.to_string(),
            kind: DEFAULT_KIND.to_string(),
        }
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }
}

/// Result of a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Website name
    pub site: String,

    /// Public URL of the entry page
    pub url: String,

    /// Number of actions uploaded
    pub units: usize,

    /// Number of HTML references rewritten
    pub rewritten: usize,

    /// Total publish time in milliseconds
    pub duration_ms: u64,
}

/// Publishes a site directory to a platform.
pub struct Publisher {
    config: PublishConfig,
    packager: Packager,
}

impl Publisher {
    pub fn new(config: PublishConfig) -> Self {
        let packager = Packager::new(config.kind.clone());
        Self { config, packager }
    }

    /// Read the site from disk and publish it.
    pub async fn publish(&self, platform: &dyn Platform) -> Result<PublishReport, DeployError> {
        tracing::info!("Scanning {}", self.config.root.display());
        let files = discover(&self.config.root)?;

        tracing::info!("Reading {} files...", files.len());
        let manifest = load(files).await?;

        self.publish_manifest(platform, manifest).await
    }

    /// Publish an already loaded manifest.
    ///
    /// The package is created or updated first; actions are uploaded only
    /// after that succeeds, all at once. The first failed upload ends the run.
    /// Actions uploaded before the failure stay in place.
    pub async fn publish_manifest(
        &self,
        platform: &dyn Platform,
        mut manifest: Manifest,
    ) -> Result<PublishReport, DeployError> {
        let start = Instant::now();
        let site = self.config.site.as_str();

        if !manifest.contains_entry(&self.config.entry) {
            return Err(DeployError::MissingEntry {
                entry: self.config.entry.clone(),
                dir: self.config.root.clone(),
            });
        }

        let rewritten = rewrite_manifest(&mut manifest);

        tracing::info!("Uploading package {}...", site);
        let container = platform.put_container(site).await?;
        tracing::debug!("Package {} ready in {}", container.name, container.namespace);

        tracing::info!("Uploading {} actions...", manifest.len());
        let uploads = manifest.records().map(|record| async move {
            let unit = self.packager.package(site, record)?;
            let info = platform.put_unit(&unit).await?;
            tracing::debug!("Uploaded {}", unit.qualified_name());
            Ok::<UnitInfo, DeployError>(info)
        });
        let uploaded = try_join_all(uploads).await?;

        let namespace = uploaded
            .first()
            .map(|info| info.namespace.clone())
            .unwrap_or_else(|| format!("{}/{}", container.namespace, site));
        let url = public_url(platform.web_base(), &namespace, &self.config.entry);

        tracing::info!("Website {} uploaded.", site);

        Ok(PublishReport {
            site: site.to_string(),
            url,
            units: uploaded.len(),
            rewritten,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Public URL of a web action: `<web base>/<namespace>/<entry>.http`.
pub fn public_url(web_base: &str, namespace: &str, entry: &str) -> String {
    format!("{}/{}/{}.http", web_base.trim_end_matches('/'), namespace, entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;
    use webwhisk_platform::{CallEvent, MemoryPlatform, PlatformCall, QualifiedName};

    fn write_site(dir: &std::path::Path) {
        fs::write(
            dir.join("index.html"),
            r#"<link rel="stylesheet" owww="true" href="style.css"><script owww="true" src="app.js"></script>"#,
        )
        .unwrap();
        fs::write(dir.join("style.css"), "h1 { color: red; }").unwrap();
        fs::write(dir.join("app.js"), "console.log('hi');").unwrap();
    }

    #[test]
    fn builds_public_url() {
        assert_eq!(
            public_url("https://host/api/v1/experimental/web/", "guest/demo", "index.html"),
            "https://host/api/v1/experimental/web/guest/demo/index.html.http"
        );
    }

    #[tokio::test]
    async fn missing_entry_makes_no_remote_calls() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("home.html"), "<h1>Home</h1>").unwrap();
        let platform = MemoryPlatform::new();

        let publisher = Publisher::new(PublishConfig::new("demo", temp.path()));
        let err = publisher.publish(&platform).await.unwrap_err();

        assert!(matches!(err, DeployError::MissingEntry { ref entry, .. } if entry == "index.html"));
        assert!(platform.events().await.is_empty());
    }

    #[tokio::test]
    async fn custom_entry_is_accepted() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("home.html"), "<h1>Home</h1>").unwrap();
        let platform = MemoryPlatform::new();

        let publisher =
            Publisher::new(PublishConfig::new("demo", temp.path()).with_entry("home.html"));
        let report = publisher.publish(&platform).await.unwrap();

        assert!(report.url.ends_with("/guest/demo/home.html.http"));
    }

    #[tokio::test]
    async fn container_is_ready_before_any_upload() {
        let temp = tempdir().unwrap();
        write_site(temp.path());
        let platform = MemoryPlatform::new();

        let report = Publisher::new(PublishConfig::new("demo", temp.path()))
            .publish(&platform)
            .await
            .unwrap();

        assert_eq!(report.units, 3);
        assert_eq!(report.rewritten, 2);

        let calls = platform.calls().await;
        let container_calls = calls
            .iter()
            .filter(|c| matches!(c, PlatformCall::PutContainer(_)))
            .count();
        let unit_calls = calls
            .iter()
            .filter(|c| matches!(c, PlatformCall::PutUnit(_)))
            .count();
        assert_eq!(container_calls, 1);
        assert_eq!(unit_calls, 3);

        let events = platform.events().await;
        let container_done = events
            .iter()
            .position(|e| *e == CallEvent::Finished(PlatformCall::PutContainer("demo".to_string())))
            .unwrap();
        let first_upload = events
            .iter()
            .position(|e| matches!(e, CallEvent::Started(PlatformCall::PutUnit(_))))
            .unwrap();
        assert!(container_done < first_upload);
    }

    #[tokio::test]
    async fn uploads_are_dispatched_concurrently() {
        let temp = tempdir().unwrap();
        write_site(temp.path());
        let platform = MemoryPlatform::new();

        Publisher::new(PublishConfig::new("demo", temp.path()))
            .publish(&platform)
            .await
            .unwrap();

        let events = platform.events().await;
        let first_finished_upload = events
            .iter()
            .position(|e| matches!(e, CallEvent::Finished(PlatformCall::PutUnit(_))))
            .unwrap();
        let started_before = events[..first_finished_upload]
            .iter()
            .filter(|e| matches!(e, CallEvent::Started(PlatformCall::PutUnit(_))))
            .count();
        assert_eq!(started_before, 3);
    }

    #[tokio::test]
    async fn failed_upload_aborts_without_rollback() {
        let temp = tempdir().unwrap();
        write_site(temp.path());
        let platform = MemoryPlatform::new().fail_unit("style.css");

        let err = Publisher::new(PublishConfig::new("demo", temp.path()))
            .publish(&platform)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::RemoteCall(_)));
        assert!(platform.has_container("demo").await);
        let calls = platform.calls().await;
        assert!(!calls
            .iter()
            .any(|c| matches!(c, PlatformCall::DeleteUnit(_) | PlatformCall::DeleteContainer(_))));
    }

    #[tokio::test]
    async fn uploads_rewritten_html() {
        let temp = tempdir().unwrap();
        write_site(temp.path());
        let platform = MemoryPlatform::new();

        Publisher::new(PublishConfig::new("demo", temp.path()))
            .publish(&platform)
            .await
            .unwrap();

        let units = platform.units("demo").await.unwrap();
        let index = units.iter().find(|u| u.name == "index.html").unwrap();
        assert_eq!(
            index.response.body,
            r#"<link rel="stylesheet" owww="true" href="style.css.http"><script owww="true" src="app.js.http"></script>"#
        );
        assert_eq!(index.qualified_name(), QualifiedName::new("demo", "index.html"));
    }

    #[tokio::test]
    async fn unreadable_directory_makes_no_remote_calls() {
        let temp = tempdir().unwrap();
        let platform = MemoryPlatform::new();

        let err = Publisher::new(PublishConfig::new("demo", temp.path().join("missing")))
            .publish(&platform)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Site(webwhisk_site::SiteError::FileSystem { .. })));
        assert!(platform.events().await.is_empty());
    }
}
