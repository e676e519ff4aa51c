//! Platform credentials and endpoints.
//!
//! Credentials come from the same properties file the `wsk` CLI uses:
//! `$WSK_CONFIG_FILE` if set, otherwise `~/.wskprops`.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PlatformError;

/// API host used when the props file does not name one.
pub const DEFAULT_API_HOST: &str = "openwhisk.ng.bluemix.net";

/// Namespace placeholder resolved by the platform to the caller's namespace.
pub const DEFAULT_NAMESPACE: &str = "_";

/// Path of web actions below the API host.
pub const WEB_ACTION_PATH: &str = "api/v1/experimental/web";

/// Environment variable naming an alternative props file.
pub const CONFIG_FILE_ENV: &str = "WSK_CONFIG_FILE";

/// Values read from a `.wskprops` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WskProps {
    pub api_host: Option<String>,
    pub auth: Option<String>,
    pub namespace: Option<String>,
}

impl WskProps {
    /// Parse `KEY=value` lines. Blank lines and `#`/`!` comments are skipped.
    pub fn parse(source: &str) -> Self {
        let mut props = Self::default();

        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let Some(split) = line.find(|c: char| c == '=' || c == ':') else {
                continue;
            };
            let key = line[..split].trim();
            let value = line[split + 1..].trim();
            if value.is_empty() {
                continue;
            }

            match key {
                "APIHOST" => props.api_host = Some(value.to_string()),
                "AUTH" => props.auth = Some(value.to_string()),
                "NAMESPACE" => props.namespace = Some(value.to_string()),
                _ => {}
            }
        }

        props
    }

    /// Load the props file at `path`. A missing file yields empty props.
    pub fn load_from(path: &Path) -> Result<Self, PlatformError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!("Loaded platform config from {}", path.display());
                Ok(Self::parse(&content))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No platform config at {}", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(PlatformError::Config {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Load the props file from its default location.
    pub fn load() -> Result<Self, PlatformError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// `$WSK_CONFIG_FILE`, falling back to `~/.wskprops`.
    pub fn default_path() -> Option<PathBuf> {
        env::var_os(CONFIG_FILE_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".wskprops")))
    }
}

/// Resolved connection settings for the platform client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// API host including scheme, without trailing slash
    pub api_host: String,

    /// `<uuid>:<key>` credential pair
    pub auth: Option<String>,

    /// Namespace used in API paths
    pub namespace: String,

    /// Base of public web action URLs
    pub web_base: String,

    /// Skip TLS certificate verification
    pub ignore_certs: bool,
}

impl PlatformConfig {
    /// Resolve settings from props, filling in defaults.
    pub fn from_props(props: &WskProps) -> Self {
        let api_host = normalize_host(props.api_host.as_deref().unwrap_or(DEFAULT_API_HOST));
        let web_base = format!("{api_host}/{WEB_ACTION_PATH}");

        Self {
            api_host,
            auth: props.auth.clone(),
            namespace: props
                .namespace
                .clone()
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            web_base,
            ignore_certs: false,
        }
    }

    pub fn with_web_base(mut self, web_base: impl Into<String>) -> Self {
        self.web_base = web_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_ignore_certs(mut self, ignore_certs: bool) -> Self {
        self.ignore_certs = ignore_certs;
        self
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}
