//! Types exchanged with the remote platform.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Annotation key that makes an action reachable over plain HTTP.
pub const WEB_EXPORT_ANNOTATION: &str = "web-export";

/// Response headers returned by a web action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseHeaders {
    #[serde(rename = "content-type")]
    pub content_type: String,
}

/// The canned HTTP response a web action returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebResponse {
    pub headers: ResponseHeaders,
    pub body: String,
}

/// Code and runtime of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitExec {
    /// Runtime kind, e.g. `nodejs:default`
    pub kind: String,

    /// Action source
    pub code: String,
}

/// A key/value annotation on a platform entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub key: String,
    pub value: serde_json::Value,
}

/// Fully qualified action name within a namespace: `<container>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub container: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(container: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.name)
    }
}

/// One file of a site packaged as an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableUnit {
    /// Site (package) the action belongs to
    pub container: String,

    /// Action name, equal to the file name
    pub name: String,

    /// Response the action returns when invoked
    pub response: WebResponse,

    /// Whether the action is exported to the web
    pub web_exposed: bool,

    /// Rendered action code
    pub exec: UnitExec,
}

impl ExecutableUnit {
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(&self.container, &self.name)
    }

    /// Annotations sent along with the action.
    pub fn annotations(&self) -> Vec<Annotation> {
        if self.web_exposed {
            vec![Annotation {
                key: WEB_EXPORT_ANNOTATION.to_string(),
                value: serde_json::Value::Bool(true),
            }]
        } else {
            Vec::new()
        }
    }
}

/// A member of a container as listed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitRef {
    pub name: String,
}

/// A site's grouping container as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContainerInfo {
    pub name: String,

    pub namespace: String,

    /// Member actions; only present on lookups
    #[serde(default)]
    pub actions: Vec<UnitRef>,
}

/// Result of creating or updating an action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitInfo {
    pub name: String,

    /// Namespace the action resolves under, e.g. `guest/demo`
    pub namespace: String,
}
