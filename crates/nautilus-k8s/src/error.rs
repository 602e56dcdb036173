use kube::config::KubeconfigError;
use thiserror::Error;

/// Errors raised while loading a kubeconfig or building a client from it
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("failed to read kubeconfig, is kubectl configured?")]
    ReadKubeconfig(#[source] KubeconfigError),

    #[error("failed to create config for context: {context}")]
    Config {
        context: String,
        #[source]
        source: KubeconfigError,
    },

    #[error("failed to create client for context: {context}")]
    Client {
        context: String,
        #[source]
        source: kube::Error,
    },
}
