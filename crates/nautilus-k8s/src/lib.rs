//! Kubernetes client for nautilus
//!
//! This crate owns kubeconfig handling and the [`ClusterBackend`] seam the
//! inspector talks to. [`KubeBackend`] is the kube-rs implementation.

mod backend;
mod client;
mod config;
mod error;

pub use backend::{ApiObject, ClusterBackend, KubeBackend, NamespacedObject};
pub use client::KubeClient;
pub use config::ClusterConfig;
pub use error::ConnectError;

// Re-export types that are used in our public API
pub use nautilus_types::ContextInfo;
