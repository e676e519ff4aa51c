//! Project configuration (webwhisk.toml) and platform settings.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use webwhisk_platform::{PlatformConfig, WskProps};

/// Default project file name.
pub const CONFIG_FILE: &str = "webwhisk.toml";

/// Setting this to `0` disables certificate verification, as with Node.js tools.
const TLS_REJECT_ENV: &str = "NODE_TLS_REJECT_UNAUTHORIZED";

/// Configuration file structure (webwhisk.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub platform: PlatformSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct SiteSection {
    /// Website name
    pub name: Option<String>,
    /// Directory holding the site files
    pub path: Option<PathBuf>,
    /// Entry HTML page
    pub entry: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlatformSection {
    /// Base of public web action URLs
    pub web_base: Option<String>,
    /// Runtime kind of generated actions
    pub kind: Option<String>,
    #[serde(default)]
    pub ignore_certs: bool,
}

impl ProjectConfig {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());

        Ok(config)
    }

    /// Resolve platform settings from the props file and this project file.
    pub fn platform_config(&self) -> Result<PlatformConfig> {
        let props = WskProps::load()?;
        Ok(self.platform_config_from(&props, tls_disabled_by_env()))
    }

    fn platform_config_from(&self, props: &WskProps, tls_disabled: bool) -> PlatformConfig {
        let mut config = PlatformConfig::from_props(props)
            .with_ignore_certs(self.platform.ignore_certs || tls_disabled);

        if let Some(web_base) = &self.platform.web_base {
            config = config.with_web_base(web_base.as_str());
        }

        config
    }
}

fn tls_disabled_by_env() -> bool {
    env::var(TLS_REJECT_ENV).is_ok_and(|value| value.trim() == "0")
}
