use std::path::Path;

use kube::config::{KubeConfigOptions, Kubeconfig};
use tracing::debug;

use crate::error::ConnectError;
use nautilus_types::ContextInfo;

/// Kubeconfig wrapper that knows the available contexts and can build a
/// client bound to any of them
#[derive(Clone, Debug)]
pub struct KubeClient {
    kubeconfig: Kubeconfig,
    current_context: Option<String>,
}

impl KubeClient {
    /// Load the kubeconfig from `path`, or through the default discovery
    pub fn load(path: Option<&Path>) -> Result<Self, ConnectError> {
        let kubeconfig = match path {
            Some(path) => {
                debug!(path = %path.display(), "reading kubeconfig");
                Kubeconfig::read_from(path)
            }
            None => Kubeconfig::read(),
        }
        .map_err(ConnectError::ReadKubeconfig)?;

        Ok(Self::from_kubeconfig(kubeconfig))
    }

    pub fn from_kubeconfig(kubeconfig: Kubeconfig) -> Self {
        let current_context = kubeconfig.current_context.clone();
        Self {
            kubeconfig,
            current_context,
        }
    }

    /// Get all available contexts from kubeconfig
    pub fn get_contexts(&self) -> Vec<ContextInfo> {
        self.kubeconfig
            .contexts
            .iter()
            .map(|ctx| {
                let context = ctx.context.as_ref();
                ContextInfo::new(
                    ctx.name.clone(),
                    context.map(|c| c.cluster.clone()).unwrap_or_default(),
                    context.and_then(|c| c.user.clone()).unwrap_or_default(),
                    context.and_then(|c| c.namespace.clone()),
                    Some(&ctx.name) == self.current_context.as_ref(),
                )
            })
            .collect()
    }

    pub fn has_context(&self, name: &str) -> bool {
        self.kubeconfig.contexts.iter().any(|c| c.name == name)
    }

    /// Get the current context name
    pub fn current_context(&self) -> Option<&str> {
        self.current_context.as_deref()
    }

    /// Mark `name` as the active context for [`get_contexts`](Self::get_contexts)
    pub fn set_current_context(&mut self, name: &str) {
        self.current_context = Some(name.to_string());
    }

    /// Build a `kube::Config` for `context`, or for the current context when `None`
    pub async fn config_for_context(
        &self,
        context: Option<&str>,
    ) -> Result<kube::Config, ConnectError> {
        kube::Config::from_custom_kubeconfig(
            self.kubeconfig.clone(),
            &KubeConfigOptions {
                context: context.map(str::to_string),
                ..Default::default()
            },
        )
        .await
        .map_err(|source| ConnectError::Config {
            context: context_label(context),
            source,
        })
    }

    /// Create a kube::Client for a specific context.
    ///
    /// Returns the client together with the API server URL it talks to.
    pub async fn client_for_context(
        &self,
        context: Option<&str>,
    ) -> Result<(kube::Client, String), ConnectError> {
        let config = self.config_for_context(context).await?;
        let cluster_url = config
            .cluster_url
            .to_string()
            .trim_end_matches('/')
            .to_string();

        let client = kube::Client::try_from(config).map_err(|source| ConnectError::Client {
            context: context_label(context),
            source,
        })?;

        debug!(%cluster_url, context = ?context, "created kube client");
        Ok((client, cluster_url))
    }
}

fn context_label(context: Option<&str>) -> String {
    context.unwrap_or("<current>").to_string()
}
