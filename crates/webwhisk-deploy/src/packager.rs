//! Packaging of site files as web actions.
//!
//! The platform only stores code, so each file becomes an action whose
//! `main` returns the file as a canned HTTP response.

use minijinja::{context, AutoEscape, Environment};

use webwhisk_platform::{ExecutableUnit, ResponseHeaders, UnitExec, WebResponse};
use webwhisk_site::FileRecord;

use crate::error::DeployError;

/// Runtime the generated actions run on.
pub const DEFAULT_KIND: &str = "nodejs:default";

const ACTION_TEMPLATE: &str = r#"function main() {
  return {{ response }};
}"#;

/// Turns file records into executable units.
pub struct Packager {
    env: Environment<'static>,
    kind: String,
}

impl Default for Packager {
    fn default() -> Self {
        Self::new(DEFAULT_KIND)
    }
}

impl Packager {
    /// Create a packager producing actions for the given runtime kind.
    pub fn new(kind: impl Into<String>) -> Self {
        let mut env = Environment::new();

        // The response is already serialized JSON
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template("action", ACTION_TEMPLATE)
            .expect("Failed to add action template");

        Self {
            env,
            kind: kind.into(),
        }
    }

    /// Package one file of `site`.
    pub fn package(&self, site: &str, record: &FileRecord) -> Result<ExecutableUnit, DeployError> {
        let response = WebResponse {
            headers: ResponseHeaders {
                content_type: record.content_type().to_string(),
            },
            body: record.content.clone(),
        };

        let json = serde_json::to_string(&response).map_err(|e| DeployError::Package {
            name: record.name.clone(),
            message: e.to_string(),
        })?;

        let code = self
            .env
            .get_template("action")
            .and_then(|template| template.render(context! { response => json }))
            .map_err(|e| DeployError::Package {
                name: record.name.clone(),
                message: e.to_string(),
            })?;

        Ok(ExecutableUnit {
            container: site.to_string(),
            name: record.name.clone(),
            response,
            web_exposed: true,
            exec: UnitExec {
                kind: self.kind.clone(),
                code,
            },
        })
    }
}
