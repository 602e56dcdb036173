use std::path::PathBuf;

use nautilus_k8s::ConnectError;
use thiserror::Error;

use crate::manifest::ManifestError;

pub type Result<T, E = InspectError> = std::result::Result<T, E>;

/// Errors returned by [`ClusterInspector`](crate::ClusterInspector) operations
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("error {action}")]
    Api {
        action: &'static str,
        #[source]
        source: kube::Error,
    },

    #[error("Context '{0}' not found.")]
    ContextNotFound(String),

    #[error("error switching context to '{context}'")]
    SwitchContext {
        context: String,
        #[source]
        source: ConnectError,
    },

    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(String),

    #[error("error reading {}", path.display())]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error applying configuration")]
    Manifest(#[from] ManifestError),
}

impl InspectError {
    /// Wrap a kube error with the action that was being attempted
    pub(crate) fn api(action: &'static str) -> impl FnOnce(kube::Error) -> Self {
        move |source| Self::Api { action, source }
    }
}
