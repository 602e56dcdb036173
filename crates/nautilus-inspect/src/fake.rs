//! In-memory [`ClusterBackend`] for tests

use std::cell::RefCell;
use std::collections::HashSet;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIResource, APIResourceList};
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::ResourceExt;
use kube::core::ErrorResponse;
use serde_json::Value;

use nautilus_k8s::{ApiObject, ClusterBackend, ConnectError, NamespacedObject};
use nautilus_types::ContextInfo;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    UseContext(String),
    Create {
        kind: String,
        namespace: String,
        name: String,
    },
    Patch {
        kind: String,
        namespace: String,
        name: String,
    },
}

/// Serves objects seeded with [`with_object`](Self::with_object) and answers
/// 409 when an object is created twice
pub struct FakeBackend {
    contexts: Vec<String>,
    current: Option<String>,
    objects: Vec<Value>,
    failing: bool,
    existing: RefCell<HashSet<(String, String, String)>>,
    created: RefCell<Vec<Value>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            contexts: vec!["dev".to_string(), "prod".to_string()],
            current: Some("dev".to_string()),
            objects: Vec::new(),
            failing: false,
            existing: RefCell::default(),
            created: RefCell::default(),
            calls: RefCell::default(),
        }
    }

    pub fn with_object(mut self, object: Value) -> Self {
        self.objects.push(object);
        self
    }

    /// Make every read call fail with a 500
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Mutating calls in the order they were issued
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn last_created(&self) -> Option<Value> {
        self.created.borrow().last().cloned()
    }

    fn check(&self) -> kube::Result<()> {
        if self.failing {
            return Err(api_error(500, "InternalError", "the server is on fire"));
        }
        Ok(())
    }

    fn objects_of<K: ApiObject>(&self, namespace: Option<&str>) -> kube::Result<Vec<K>> {
        self.check()?;
        let kind = K::kind(&());

        self.objects
            .iter()
            .filter(|obj| obj["kind"] == *kind)
            .filter(|obj| namespace.is_none_or(|ns| obj["metadata"]["namespace"] == ns))
            .map(|obj| serde_json::from_value(obj.clone()).map_err(kube::Error::SerdeError))
            .collect()
    }
}

pub fn api_error(code: u16, reason: &str, message: &str) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: message.to_string(),
        reason: reason.to_string(),
        code,
    })
}

impl ClusterBackend for FakeBackend {
    fn cluster_url(&self) -> String {
        "https://127.0.0.1:6443".to_string()
    }

    fn contexts(&self) -> Vec<ContextInfo> {
        self.contexts
            .iter()
            .map(|name| {
                ContextInfo::new(
                    name.clone(),
                    format!("{name}-cluster"),
                    format!("{name}-user"),
                    None,
                    self.current.as_ref() == Some(name),
                )
            })
            .collect()
    }

    fn has_context(&self, name: &str) -> bool {
        self.contexts.iter().any(|c| c == name)
    }

    fn current_context(&self) -> Option<String> {
        self.current.clone()
    }

    async fn use_context(&mut self, name: &str) -> Result<(), ConnectError> {
        self.calls.borrow_mut().push(Call::UseContext(name.to_string()));
        self.current = Some(name.to_string());
        Ok(())
    }

    async fn server_version(&self) -> kube::Result<Info> {
        self.check()?;
        Ok(Info {
            major: "1".to_string(),
            minor: "30".to_string(),
            platform: "linux/amd64".to_string(),
            git_version: "v1.30.2".to_string(),
            ..Default::default()
        })
    }

    async fn core_api_resources(&self) -> kube::Result<APIResourceList> {
        self.check()?;
        let resource = |name: &str, kind: &str| APIResource {
            name: name.to_string(),
            kind: kind.to_string(),
            namespaced: true,
            ..Default::default()
        };
        Ok(APIResourceList {
            group_version: "v1".to_string(),
            resources: vec![resource("pods", "Pod"), resource("services", "Service")],
        })
    }

    async fn list_all<K: ApiObject>(&self) -> kube::Result<Vec<K>> {
        self.objects_of(None)
    }

    async fn list_namespaced<K: NamespacedObject>(&self, namespace: &str) -> kube::Result<Vec<K>> {
        self.objects_of(Some(namespace))
    }

    async fn create<K: NamespacedObject>(&self, namespace: &str, obj: &K) -> kube::Result<K> {
        let kind = K::kind(&()).to_string();
        let name = obj.name_any();
        self.calls.borrow_mut().push(Call::Create {
            kind: kind.clone(),
            namespace: namespace.to_string(),
            name: name.clone(),
        });

        let key = (kind, namespace.to_string(), name.clone());
        if !self.existing.borrow_mut().insert(key) {
            return Err(api_error(
                409,
                "AlreadyExists",
                &format!("\"{name}\" already exists"),
            ));
        }

        let value = serde_json::to_value(obj).map_err(kube::Error::SerdeError)?;
        self.created.borrow_mut().push(value);
        Ok(obj.clone())
    }

    async fn patch<K: NamespacedObject>(
        &self,
        namespace: &str,
        name: &str,
        obj: &K,
    ) -> kube::Result<K> {
        self.calls.borrow_mut().push(Call::Patch {
            kind: K::kind(&()).to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        Ok(obj.clone())
    }
}
