//! What the user asked for, from flags or from the wizard.

use std::path::PathBuf;

use anyhow::{bail, Result};
use webwhisk_deploy::DEFAULT_ENTRY;

use crate::config::ProjectConfig;

/// A resolved upload or delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteRequest {
    Upload {
        site: String,
        path: PathBuf,
        entry: String,
    },
    Delete {
        site: String,
    },
}

impl SiteRequest {
    /// Build an upload request, filling gaps from the project file.
    pub fn upload(
        site: Option<String>,
        path: Option<PathBuf>,
        entry: Option<String>,
        project: &ProjectConfig,
    ) -> Result<Self> {
        let site = resolve_site(site, project)?;
        let Some(path) = path.or_else(|| project.site.path.clone()) else {
            bail!("A path to the website folder is required for upload (use --path)");
        };
        let entry = entry
            .or_else(|| project.site.entry.clone())
            .unwrap_or_else(|| DEFAULT_ENTRY.to_string());

        Ok(Self::Upload { site, path, entry })
    }

    /// Build a delete request, falling back to the project's site name.
    pub fn delete(site: Option<String>, project: &ProjectConfig) -> Result<Self> {
        Ok(Self::Delete {
            site: resolve_site(site, project)?,
        })
    }

    pub fn site(&self) -> &str {
        match self {
            Self::Upload { site, .. } | Self::Delete { site } => site,
        }
    }
}

fn resolve_site(site: Option<String>, project: &ProjectConfig) -> Result<String> {
    match site.or_else(|| project.site.name.clone()) {
        Some(name) if !name.trim().is_empty() => Ok(name.trim().to_string()),
        _ => bail!("A website name is required (use --website-name)"),
    }
}
