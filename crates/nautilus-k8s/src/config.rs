use std::path::PathBuf;

/// Where to find credentials and which context to start in.
///
/// Both fields fall back to kubeconfig discovery: `KUBECONFIG`, then
/// `~/.kube/config`, then the kubeconfig's `current-context`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterConfig {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
}

impl ClusterConfig {
    pub fn new(kubeconfig: Option<PathBuf>, context: Option<String>) -> Self {
        Self {
            kubeconfig,
            context,
        }
    }
}
