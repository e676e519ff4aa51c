//! OpenWhisk REST client.
//!
//! Sites map to packages and files to actions inside them:
//!
//! - `PUT    /api/v1/namespaces/{ns}/packages/{site}?overwrite=true`
//! - `GET    /api/v1/namespaces/{ns}/packages/{site}`
//! - `DELETE /api/v1/namespaces/{ns}/packages/{site}`
//! - `PUT    /api/v1/namespaces/{ns}/actions/{site}/{file}?overwrite=true`
//! - `DELETE /api/v1/namespaces/{ns}/actions/{site}/{file}`

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{Platform, PlatformFuture};
use crate::config::{PlatformConfig, WskProps};
use crate::error::PlatformError;
use crate::types::{Annotation, ContainerInfo, ExecutableUnit, QualifiedName, UnitExec, UnitInfo};

/// Characters escaped in entity path segments.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Request body for creating or updating an action.
#[derive(Serialize)]
struct ActionBody<'a> {
    exec: &'a UnitExec,
    annotations: Vec<Annotation>,
}

/// Async OpenWhisk client using `reqwest` with basic authentication.
pub struct OpenWhiskClient {
    http: reqwest::Client,
    api_host: String,
    namespace: String,
    user: String,
    key: String,
    web_base: String,
}

impl OpenWhiskClient {
    /// Create a client from resolved platform settings.
    pub fn new(config: &PlatformConfig) -> Result<Self, PlatformError> {
        let auth = config.auth.as_deref().ok_or_else(|| {
            PlatformError::MissingAuth(
                WskProps::default_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| ".wskprops".to_string()),
            )
        })?;
        let (user, key) = auth.split_once(':').ok_or(PlatformError::InvalidAuth)?;

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.ignore_certs)
            .build()
            .map_err(|source| PlatformError::Http {
                operation: "build HTTP client".to_string(),
                source,
            })?;

        Ok(Self {
            http,
            api_host: config.api_host.clone(),
            namespace: config.namespace.clone(),
            user: user.to_string(),
            key: key.to_string(),
            web_base: config.web_base.clone(),
        })
    }

    /// URL of an entity in the configured namespace.
    fn entity_url(&self, collection: &str, segments: &[&str]) -> String {
        let mut url = format!(
            "{}/api/v1/namespaces/{}/{}",
            self.api_host,
            encode(&self.namespace),
            collection
        );
        for segment in segments {
            url.push('/');
            url.push_str(&encode(segment));
        }
        url
    }

    /// Sends an authenticated request and checks the status.
    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response, PlatformError> {
        tracing::debug!("{}", operation);

        let response = request
            .basic_auth(&self.user, Some(&self.key))
            .send()
            .await
            .map_err(|source| PlatformError::Http {
                operation: operation.to_string(),
                source,
            })?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(PlatformError::NotFound {
                operation: operation.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T, PlatformError> {
    response.json().await.map_err(|source| PlatformError::Http {
        operation: operation.to_string(),
        source,
    })
}

fn encode(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

impl Platform for OpenWhiskClient {
    fn put_container<'a>(&'a self, name: &'a str) -> PlatformFuture<'a, ContainerInfo> {
        Box::pin(async move {
            let operation = format!("update package {name}");
            let request = self
                .http
                .put(self.entity_url("packages", &[name]))
                .query(&[("overwrite", "true")])
                .json(&serde_json::json!({}));
            let response = self.send(&operation, request).await?;
            decode(&operation, response).await
        })
    }

    fn get_container<'a>(&'a self, name: &'a str) -> PlatformFuture<'a, ContainerInfo> {
        Box::pin(async move {
            let operation = format!("get package {name}");
            let request = self.http.get(self.entity_url("packages", &[name]));
            let response = self.send(&operation, request).await?;
            decode(&operation, response).await
        })
    }

    fn delete_container<'a>(&'a self, name: &'a str) -> PlatformFuture<'a, ()> {
        Box::pin(async move {
            let operation = format!("delete package {name}");
            let request = self.http.delete(self.entity_url("packages", &[name]));
            self.send(&operation, request).await?;
            Ok(())
        })
    }

    fn put_unit<'a>(&'a self, unit: &'a ExecutableUnit) -> PlatformFuture<'a, UnitInfo> {
        Box::pin(async move {
            let operation = format!("update action {}", unit.qualified_name());
            let body = ActionBody {
                exec: &unit.exec,
                annotations: unit.annotations(),
            };
            let request = self
                .http
                .put(self.entity_url("actions", &[unit.container.as_str(), unit.name.as_str()]))
                .query(&[("overwrite", "true")])
                .json(&body);
            let response = self.send(&operation, request).await?;
            decode(&operation, response).await
        })
    }

    fn delete_unit<'a>(&'a self, name: &'a QualifiedName) -> PlatformFuture<'a, ()> {
        Box::pin(async move {
            let operation = format!("delete action {name}");
            let request = self
                .http
                .delete(self.entity_url("actions", &[name.container.as_str(), name.name.as_str()]));
            self.send(&operation, request).await?;
            Ok(())
        })
    }

    fn web_base(&self) -> &str {
        &self.web_base
    }
}
