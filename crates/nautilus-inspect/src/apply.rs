//! Create-or-patch of manifest files

use std::fmt;
use std::path::Path;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{InspectError, Result};
use crate::inspector::ClusterInspector;
use crate::manifest::{Manifest, parse_manifests};
use nautilus_k8s::{ClusterBackend, NamespacedObject};

/// What happened to one document of an applied file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created { kind: String, name: String },
    Updated { kind: String, name: String },
    Skipped { kind: String },
    Failed { kind: String, name: String, reason: String },
}

impl ApplyOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { kind, name } => write!(f, "{} '{}' created.", capitalize(kind), name),
            Self::Updated { kind, name } => write!(f, "{} '{}' updated.", capitalize(kind), name),
            Self::Skipped { kind } => write!(f, "Unsupported resource kind: {kind}"),
            Self::Failed { kind, name, reason } => {
                write!(f, "Error applying {kind} '{name}': {reason}")
            }
        }
    }
}

/// `deployment` -> `Deployment`
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl<B: ClusterBackend> ClusterInspector<B> {
    /// Apply every document in the YAML file at `path`.
    ///
    /// Reading or parsing the file fails the whole operation before any call
    /// is made. After that each document gets its own [`ApplyOutcome`].
    pub async fn apply_file(&self, path: &Path) -> Result<Vec<ApplyOutcome>> {
        let input = std::fs::read_to_string(path).map_err(|source| InspectError::ReadManifest {
            path: path.to_path_buf(),
            source,
        })?;

        let manifests = parse_manifests(&input)?;
        Ok(self.apply(&manifests).await)
    }

    /// Create each manifest, patching it instead when it already exists
    pub async fn apply(&self, manifests: &[Manifest]) -> Vec<ApplyOutcome> {
        let mut outcomes = Vec::with_capacity(manifests.len());

        for manifest in manifests {
            let outcome = match manifest.kind.as_str() {
                "deployment" => self.create_or_patch::<Deployment>(manifest).await,
                "service" => self.create_or_patch::<Service>(manifest).await,
                "pod" => self.create_or_patch::<Pod>(manifest).await,
                other => {
                    warn!(kind = other, name = %manifest.name, "skipping unsupported kind");
                    ApplyOutcome::Skipped {
                        kind: other.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn create_or_patch<K: NamespacedObject>(&self, manifest: &Manifest) -> ApplyOutcome {
        let kind = manifest.kind.clone();
        let name = manifest.name.clone();
        let failed = |reason: String| ApplyOutcome::Failed {
            kind: manifest.kind.clone(),
            name: manifest.name.clone(),
            reason,
        };

        // The dispatch above is case-insensitive, the typed decoder is not.
        let mut body = manifest.body.clone();
        body["kind"] = Value::String(K::kind(&()).into_owned());

        let obj: K = match serde_json::from_value(body) {
            Ok(obj) => obj,
            Err(e) => return failed(e.to_string()),
        };

        match self.backend.create(&self.namespace, &obj).await {
            Ok(_) => {
                info!(%kind, %name, namespace = %self.namespace, "created");
                ApplyOutcome::Created { kind, name }
            }
            Err(kube::Error::Api(ae)) if ae.code == 409 => {
                match self.backend.patch(&self.namespace, &name, &obj).await {
                    Ok(_) => {
                        info!(%kind, %name, namespace = %self.namespace, "exists, patched");
                        ApplyOutcome::Updated { kind, name }
                    }
                    Err(e) => failed(e.to_string()),
                }
            }
            Err(e) => failed(e.to_string()),
        }
    }
}
