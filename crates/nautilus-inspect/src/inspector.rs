use k8s_openapi::api::core::v1::{Namespace, Node, Pod, Service};
use kube::api::ResourceExt;
use tracing::{debug, info, warn};

use crate::builders::{self, ResourceKind};
use crate::error::{InspectError, Result};
use nautilus_k8s::ClusterBackend;
use nautilus_types::{
    ClusterInfo, NamespaceInfo, NodeAddress, NodeInfo, PodInfo, PodStatus, ServerVersion,
};

/// Name of the cluster DNS service
pub const KUBE_DNS_SERVICE: &str = "kube-dns";

/// Facade over a [`ClusterBackend`] with a current namespace.
///
/// Each method issues its calls in sequence and hands back typed results;
/// rendering is left to the caller.
pub struct ClusterInspector<B> {
    pub(crate) backend: B,
    pub(crate) namespace: String,
}

impl<B: ClusterBackend> ClusterInspector<B> {
    pub fn new(backend: B, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = namespace.into();
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// URL of the API server the current context points at
    pub fn control_plane_endpoint(&self) -> String {
        self.backend.cluster_url()
    }

    /// Cluster IP of the `kube-dns` service in the current namespace, if any
    pub async fn kube_dns_cluster_ip(&self) -> Result<Option<String>> {
        let services: Vec<Service> = self
            .backend
            .list_namespaced(&self.namespace)
            .await
            .map_err(InspectError::api("getting KubeDNS info"))?;

        Ok(services
            .into_iter()
            .find(|svc| svc.metadata.name.as_deref() == Some(KUBE_DNS_SERVICE))
            .and_then(|svc| svc.spec)
            .and_then(|spec| spec.cluster_ip))
    }

    /// Number of resource kinds served by the core `v1` API group
    pub async fn api_resource_count(&self) -> Result<usize> {
        let list = self
            .backend
            .core_api_resources()
            .await
            .map_err(InspectError::api("getting API resources"))?;

        Ok(list.resources.len())
    }

    /// Endpoints and counters for `--cluster-info`.
    ///
    /// Lookups that fail are logged and left empty so the endpoints still print.
    pub async fn cluster_info(&self) -> ClusterInfo {
        let host = self.control_plane_endpoint();

        let api_resources = self
            .api_resource_count()
            .await
            .inspect_err(|e| warn!(error = %e, "could not count API resources"))
            .ok();

        let kube_dns_ip = self
            .kube_dns_cluster_ip()
            .await
            .inspect_err(|e| warn!(error = %e, "could not look up kube-dns"))
            .ok()
            .flatten();

        ClusterInfo {
            kube_dns_proxy: format!(
                "{host}/api/v1/namespaces/kube-system/services/{KUBE_DNS_SERVICE}:dns/proxy"
            ),
            control_plane: host,
            kube_dns_ip,
            api_resources,
        }
    }

    /// API server version
    pub async fn api_versions(&self) -> Result<ServerVersion> {
        let info = self
            .backend
            .server_version()
            .await
            .map_err(InspectError::api("getting API versions"))?;

        Ok(ServerVersion {
            major: info.major,
            minor: info.minor,
            platform: info.platform,
            git_version: info.git_version,
        })
    }

    /// Fetch all nodes in the cluster
    pub async fn nodes(&self) -> Result<Vec<NodeInfo>> {
        let nodes: Vec<Node> = self
            .backend
            .list_all()
            .await
            .map_err(InspectError::api("getting nodes"))?;

        debug!(count = nodes.len(), "listed nodes");
        Ok(nodes.into_iter().map(node_to_info).collect())
    }

    /// Fetch all namespaces in the cluster
    pub async fn namespaces(&self) -> Result<Vec<NamespaceInfo>> {
        let namespaces: Vec<Namespace> = self
            .backend
            .list_all()
            .await
            .map_err(InspectError::api("listing namespaces"))?;

        Ok(namespaces
            .into_iter()
            .map(|ns| {
                let mut info = NamespaceInfo::new(
                    ns.name_any(),
                    ns.status
                        .and_then(|s| s.phase)
                        .unwrap_or_else(|| "Unknown".to_string()),
                );
                info.created_at = ns.metadata.creation_timestamp.map(|t| t.0);
                info
            })
            .collect())
    }

    /// Fetch all pods in the current namespace
    pub async fn pods(&self) -> Result<Vec<PodInfo>> {
        let pods: Vec<Pod> = self
            .backend
            .list_namespaced(&self.namespace)
            .await
            .map_err(InspectError::api("listing pods"))?;

        Ok(pods
            .into_iter()
            .map(|pod| {
                let mut info = PodInfo::new(pod.name_any(), self.namespace.clone());

                if let Some(spec) = pod.spec {
                    info.node_name = spec.node_name;
                }

                if let Some(status) = pod.status {
                    info.pod_ip = status.pod_ip;
                    info.status = status
                        .phase
                        .as_deref()
                        .map(PodStatus::from)
                        .unwrap_or(PodStatus::Unknown);
                }

                info
            })
            .collect())
    }

    /// Rebind the backend to another kubeconfig context.
    ///
    /// Unknown names leave the backend untouched.
    pub async fn switch_context(&mut self, name: &str) -> Result<()> {
        if !self.backend.has_context(name) {
            return Err(InspectError::ContextNotFound(name.to_string()));
        }

        self.backend
            .use_context(name)
            .await
            .map_err(|source| InspectError::SwitchContext {
                context: name.to_string(),
                source,
            })?;

        info!(context = name, "switched context");
        Ok(())
    }

    /// Build a minimal deployment or service and create it in the current namespace
    pub async fn create(
        &self,
        resource_type: &str,
        name: &str,
        image: &str,
        replicas: Option<i32>,
    ) -> Result<ResourceKind> {
        let kind: ResourceKind = resource_type.parse()?;

        match kind {
            ResourceKind::Deployment => {
                let deploy = builders::deployment(name, image, replicas);
                self.backend
                    .create(&self.namespace, &deploy)
                    .await
                    .map_err(InspectError::api("creating deployment"))?;
            }
            ResourceKind::Service => {
                let svc = builders::service(name);
                self.backend
                    .create(&self.namespace, &svc)
                    .await
                    .map_err(InspectError::api("creating service"))?;
            }
        }

        info!(%kind, name, namespace = %self.namespace, "created resource");
        Ok(kind)
    }
}

/// Convert a k8s Node to NodeInfo
fn node_to_info(node: Node) -> NodeInfo {
    let mut info = NodeInfo::new(node.name_any());

    let Some(status) = node.status else {
        return info;
    };

    if let Some(phase) = status.phase {
        info.phase = phase;
    }

    if let Some(node_info) = status.node_info {
        info.kubelet_version = node_info.kubelet_version;
        info.os_image = node_info.os_image;
        info.container_runtime = node_info.container_runtime_version;
    }

    info.addresses = status
        .addresses
        .unwrap_or_default()
        .into_iter()
        .map(|a| NodeAddress {
            kind: a.type_,
            address: a.address,
        })
        .collect();

    info
}
