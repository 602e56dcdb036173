//! The seam between the inspector and the cluster API

use std::fmt::Debug;

use k8s_openapi::NamespaceResourceScope;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::api::{ListParams, Patch, PatchParams, PostParams};
use kube::{Api, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::KubeClient;
use crate::config::ClusterConfig;
use crate::error::ConnectError;
use nautilus_types::ContextInfo;

/// A statically typed API object, i.e. any k8s-openapi resource
pub trait ApiObject:
    Resource<DynamicType = ()> + Clone + Debug + DeserializeOwned + Serialize + Send + Sync + 'static
{
}

impl<K> ApiObject for K where
    K: Resource<DynamicType = ()>
        + Clone
        + Debug
        + DeserializeOwned
        + Serialize
        + Send
        + Sync
        + 'static
{
}

/// An [`ApiObject`] that lives inside a namespace
pub trait NamespacedObject: ApiObject + Resource<Scope = NamespaceResourceScope> {}

impl<K> NamespacedObject for K where K: ApiObject + Resource<Scope = NamespaceResourceScope> {}

/// Operations the inspector needs from a cluster.
///
/// Every call is a single round trip; implementations must not retry.
#[allow(async_fn_in_trait)]
pub trait ClusterBackend {
    /// API server URL of the active context
    fn cluster_url(&self) -> String;

    /// All contexts known to the kubeconfig
    fn contexts(&self) -> Vec<ContextInfo>;

    /// Whether the kubeconfig defines a context called `name`
    fn has_context(&self, name: &str) -> bool;

    fn current_context(&self) -> Option<String>;

    /// Rebind to `name`. The caller has already checked that it exists.
    async fn use_context(&mut self, name: &str) -> Result<(), ConnectError>;

    async fn server_version(&self) -> kube::Result<Info>;

    async fn core_api_resources(&self) -> kube::Result<APIResourceList>;

    async fn list_all<K: ApiObject>(&self) -> kube::Result<Vec<K>>;

    async fn list_namespaced<K: NamespacedObject>(&self, namespace: &str) -> kube::Result<Vec<K>>;

    async fn create<K: NamespacedObject>(&self, namespace: &str, obj: &K) -> kube::Result<K>;

    /// Strategic merge patch of the object called `name`
    async fn patch<K: NamespacedObject>(
        &self,
        namespace: &str,
        name: &str,
        obj: &K,
    ) -> kube::Result<K>;
}

/// [`ClusterBackend`] backed by a real `kube::Client`
pub struct KubeBackend {
    kube: KubeClient,
    client: kube::Client,
    cluster_url: String,
}

impl KubeBackend {
    /// Load the kubeconfig named by `config` and connect to its context
    pub async fn connect(config: &ClusterConfig) -> Result<Self, ConnectError> {
        let mut kube = KubeClient::load(config.kubeconfig.as_deref())?;
        let (client, cluster_url) = kube.client_for_context(config.context.as_deref()).await?;

        if let Some(context) = &config.context {
            kube.set_current_context(context);
        }

        Ok(Self {
            kube,
            client,
            cluster_url,
        })
    }
}

impl ClusterBackend for KubeBackend {
    fn cluster_url(&self) -> String {
        self.cluster_url.clone()
    }

    fn contexts(&self) -> Vec<ContextInfo> {
        self.kube.get_contexts()
    }

    fn has_context(&self, name: &str) -> bool {
        self.kube.has_context(name)
    }

    fn current_context(&self) -> Option<String> {
        self.kube.current_context().map(str::to_string)
    }

    async fn use_context(&mut self, name: &str) -> Result<(), ConnectError> {
        let (client, cluster_url) = self.kube.client_for_context(Some(name)).await?;
        self.client = client;
        self.cluster_url = cluster_url;
        self.kube.set_current_context(name);
        Ok(())
    }

    async fn server_version(&self) -> kube::Result<Info> {
        debug!("fetching apiserver version");
        self.client.apiserver_version().await
    }

    async fn core_api_resources(&self) -> kube::Result<APIResourceList> {
        debug!("listing core v1 api resources");
        self.client.list_core_api_resources("v1").await
    }

    async fn list_all<K: ApiObject>(&self) -> kube::Result<Vec<K>> {
        debug!(kind = %K::kind(&()), "listing cluster-wide");
        let api: Api<K> = Api::all(self.client.clone());
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_namespaced<K: NamespacedObject>(&self, namespace: &str) -> kube::Result<Vec<K>> {
        debug!(kind = %K::kind(&()), namespace, "listing namespaced");
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn create<K: NamespacedObject>(&self, namespace: &str, obj: &K) -> kube::Result<K> {
        debug!(kind = %K::kind(&()), namespace, "creating");
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.create(&PostParams::default(), obj).await
    }

    async fn patch<K: NamespacedObject>(
        &self,
        namespace: &str,
        name: &str,
        obj: &K,
    ) -> kube::Result<K> {
        debug!(kind = %K::kind(&()), namespace, name, "patching");
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.patch(name, &PatchParams::default(), &Patch::Strategic(obj))
            .await
    }
}
