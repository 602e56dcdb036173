//! Cluster inspection for nautilus
//!
//! [`ClusterInspector`] turns one command-line action into calls against a
//! [`ClusterBackend`](nautilus_k8s::ClusterBackend) and returns typed results.
//! The [`render`] module formats those results for the terminal.

mod apply;
pub mod builders;
mod error;
mod inspector;
pub mod manifest;
pub mod render;

#[cfg(test)]
mod fake;

pub use apply::ApplyOutcome;
pub use builders::ResourceKind;
pub use error::{InspectError, Result};
pub use inspector::{ClusterInspector, KUBE_DNS_SERVICE};
pub use manifest::{Manifest, ManifestError, parse_manifests};
