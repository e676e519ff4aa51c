//! In-memory platform.
//!
//! Keeps packages and actions in process and records every call, which makes
//! it usable for dry runs and for checking call ordering.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::client::{Platform, PlatformFuture};
use crate::error::PlatformError;
use crate::types::{
    ContainerInfo, ExecutableUnit, QualifiedName, ResponseHeaders, UnitExec, UnitInfo, UnitRef,
    WebResponse,
};

const DEFAULT_NAMESPACE: &str = "guest";
const DEFAULT_WEB_BASE: &str = "http://localhost/api/v1/experimental/web";

/// A platform operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    PutContainer(String),
    GetContainer(String),
    DeleteContainer(String),
    PutUnit(QualifiedName),
    DeleteUnit(QualifiedName),
}

/// Start or end of a recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEvent {
    Started(PlatformCall),
    Finished(PlatformCall),
}

#[derive(Debug, Default)]
struct State {
    containers: BTreeMap<String, BTreeMap<String, ExecutableUnit>>,
    events: Vec<CallEvent>,
}

/// Platform backed by process memory.
#[derive(Debug, Clone)]
pub struct MemoryPlatform {
    namespace: String,
    web_base: String,
    failing: BTreeSet<String>,
    state: Arc<Mutex<State>>,
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            failing: BTreeSet::new(),
            state: Arc::default(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_web_base(mut self, web_base: impl Into<String>) -> Self {
        self.web_base = web_base.into();
        self
    }

    /// Make uploads of the named unit fail.
    pub fn fail_unit(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }

    /// Create a container holding placeholder units, without recording calls.
    pub async fn insert_container(&self, name: &str, units: &[&str]) {
        let mut state = self.state.lock().await;
        let members = state.containers.entry(name.to_string()).or_default();
        for unit in units {
            members.insert(unit.to_string(), placeholder_unit(name, unit));
        }
    }

    /// Every recorded call event, in order.
    pub async fn events(&self) -> Vec<CallEvent> {
        self.state.lock().await.events.clone()
    }

    /// Calls in the order they were issued.
    pub async fn calls(&self) -> Vec<PlatformCall> {
        self.events()
            .await
            .into_iter()
            .filter_map(|event| match event {
                CallEvent::Started(call) => Some(call),
                CallEvent::Finished(_) => None,
            })
            .collect()
    }

    /// Units stored in a container, or `None` if it does not exist.
    pub async fn units(&self, container: &str) -> Option<Vec<ExecutableUnit>> {
        let state = self.state.lock().await;
        state
            .containers
            .get(container)
            .map(|members| members.values().cloned().collect())
    }

    pub async fn has_container(&self, name: &str) -> bool {
        self.state.lock().await.containers.contains_key(name)
    }

    async fn begin(&self, call: &PlatformCall) {
        self.state
            .lock()
            .await
            .events
            .push(CallEvent::Started(call.clone()));
        // Let sibling calls start before this one completes
        tokio::task::yield_now().await;
    }
}

fn placeholder_unit(container: &str, name: &str) -> ExecutableUnit {
    ExecutableUnit {
        container: container.to_string(),
        name: name.to_string(),
        response: WebResponse {
            headers: ResponseHeaders {
                content_type: "text/plain".to_string(),
            },
            body: String::new(),
        },
        web_exposed: true,
        exec: UnitExec {
            kind: "nodejs:default".to_string(),
            code: String::new(),
        },
    }
}

impl Platform for MemoryPlatform {
    fn put_container<'a>(&'a self, name: &'a str) -> PlatformFuture<'a, ContainerInfo> {
        Box::pin(async move {
            let call = PlatformCall::PutContainer(name.to_string());
            self.begin(&call).await;

            let mut state = self.state.lock().await;
            state.containers.entry(name.to_string()).or_default();
            state.events.push(CallEvent::Finished(call));

            Ok(ContainerInfo {
                name: name.to_string(),
                namespace: self.namespace.clone(),
                actions: Vec::new(),
            })
        })
    }

    fn get_container<'a>(&'a self, name: &'a str) -> PlatformFuture<'a, ContainerInfo> {
        Box::pin(async move {
            let call = PlatformCall::GetContainer(name.to_string());
            self.begin(&call).await;

            let mut state = self.state.lock().await;
            let result = match state.containers.get(name) {
                Some(members) => Ok(ContainerInfo {
                    name: name.to_string(),
                    namespace: self.namespace.clone(),
                    actions: members
                        .keys()
                        .map(|unit| UnitRef { name: unit.clone() })
                        .collect(),
                }),
                None => Err(PlatformError::NotFound {
                    operation: format!("get package {name}"),
                }),
            };
            state.events.push(CallEvent::Finished(call));
            result
        })
    }

    fn delete_container<'a>(&'a self, name: &'a str) -> PlatformFuture<'a, ()> {
        Box::pin(async move {
            let call = PlatformCall::DeleteContainer(name.to_string());
            self.begin(&call).await;

            let mut state = self.state.lock().await;
            let operation = format!("delete package {name}");
            let result = match state.containers.get(name).map(|members| members.is_empty()) {
                None => Err(PlatformError::NotFound { operation }),
                Some(false) => Err(PlatformError::Api {
                    operation,
                    status: 409,
                    body: "package is not empty".to_string(),
                }),
                Some(true) => {
                    state.containers.remove(name);
                    Ok(())
                }
            };
            state.events.push(CallEvent::Finished(call));
            result
        })
    }

    fn put_unit<'a>(&'a self, unit: &'a ExecutableUnit) -> PlatformFuture<'a, UnitInfo> {
        Box::pin(async move {
            let call = PlatformCall::PutUnit(unit.qualified_name());
            self.begin(&call).await;

            let mut state = self.state.lock().await;
            let operation = format!("update action {}", unit.qualified_name());
            let result = if self.failing.contains(&unit.name) {
                Err(PlatformError::Api {
                    operation,
                    status: 502,
                    body: "injected failure".to_string(),
                })
            } else if let Some(members) = state.containers.get_mut(&unit.container) {
                members.insert(unit.name.clone(), unit.clone());
                Ok(UnitInfo {
                    name: unit.name.clone(),
                    namespace: format!("{}/{}", self.namespace, unit.container),
                })
            } else {
                Err(PlatformError::NotFound { operation })
            };
            state.events.push(CallEvent::Finished(call));
            result
        })
    }

    fn delete_unit<'a>(&'a self, name: &'a QualifiedName) -> PlatformFuture<'a, ()> {
        Box::pin(async move {
            let call = PlatformCall::DeleteUnit(name.clone());
            self.begin(&call).await;

            let mut state = self.state.lock().await;
            let removed = state
                .containers
                .get_mut(&name.container)
                .and_then(|members| members.remove(&name.name));
            state.events.push(CallEvent::Finished(call));

            match removed {
                Some(_) => Ok(()),
                None => Err(PlatformError::NotFound {
                    operation: format!("delete action {name}"),
                }),
            }
        })
    }

    fn web_base(&self) -> &str {
        &self.web_base
    }
}
