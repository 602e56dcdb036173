//! Shared types for nautilus
//!
//! Plain result structs for each resource kind the inspector reports on,
//! decoupled from the k8s-openapi wire types.

use chrono::{DateTime, Utc};

// ============================================================================
// Kubeconfig Types
// ============================================================================

/// Kubernetes context information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextInfo {
    pub name: String,
    pub cluster: String,
    pub user: String,
    pub namespace: Option<String>,
    pub is_current: bool,
}

impl ContextInfo {
    pub fn new(
        name: String,
        cluster: String,
        user: String,
        namespace: Option<String>,
        is_current: bool,
    ) -> Self {
        Self {
            name,
            cluster,
            user,
            namespace,
            is_current,
        }
    }
}

// ============================================================================
// Cluster Resource Types
// ============================================================================

/// Namespace information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceInfo {
    pub name: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl NamespaceInfo {
    pub fn new(name: String, status: String) -> Self {
        Self {
            name,
            status,
            created_at: None,
        }
    }

    /// Age relative to `now`, or `<unknown>` without a creation timestamp
    pub fn age(&self, now: DateTime<Utc>) -> String {
        self.created_at
            .map(|created| format_age(created, now))
            .unwrap_or_else(|| "<unknown>".to_string())
    }
}

/// A single node address such as `InternalIP: 10.0.0.4`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeAddress {
    pub kind: String,
    pub address: String,
}

/// Node information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    pub phase: String,
    pub kubelet_version: String,
    pub os_image: String,
    pub container_runtime: String,
    pub addresses: Vec<NodeAddress>,
}

impl NodeInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            phase: "Unknown".to_string(),
            kubelet_version: String::new(),
            os_image: String::new(),
            container_runtime: String::new(),
            addresses: Vec::new(),
        }
    }
}

/// Pod information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub status: PodStatus,
    pub node_name: Option<String>,
    pub pod_ip: Option<String>,
}

impl PodInfo {
    pub fn new(name: String, namespace: String) -> Self {
        Self {
            name,
            namespace,
            status: PodStatus::Unknown,
            node_name: None,
            pod_ip: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PodStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<&str> for PodStatus {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for PodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Cluster-wide Types
// ============================================================================

/// API server version as reported by `/version`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerVersion {
    pub major: String,
    pub minor: String,
    pub platform: String,
    pub git_version: String,
}

/// Endpoints and counters printed by `--cluster-info`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterInfo {
    pub control_plane: String,
    pub kube_dns_proxy: String,
    pub kube_dns_ip: Option<String>,
    pub api_resources: Option<usize>,
}

// ============================================================================
// Age Formatting
// ============================================================================

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Format the time elapsed between `created` and `now` as a single unit.
///
/// Days win over hours, hours over minutes, minutes over seconds. Values are
/// truncated, so 90 seconds is `1m`. Timestamps in the future clamp to `0s`.
pub fn format_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created).num_seconds().max(0);

    if secs >= DAY {
        format!("{}d", secs / DAY)
    } else if secs >= HOUR {
        format!("{}h", secs / HOUR)
    } else if secs >= MINUTE {
        format!("{}m", secs / MINUTE)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_age_buckets() {
        let now = now();
        assert_eq!(format_age(now - Duration::seconds(90), now), "1m");
        assert_eq!(format_age(now - Duration::seconds(3700), now), "1h");
        assert_eq!(format_age(now - Duration::days(2), now), "2d");
        assert_eq!(format_age(now - Duration::seconds(30), now), "30s");
    }

    #[test]
    fn test_age_boundaries() {
        let now = now();
        assert_eq!(format_age(now, now), "0s");
        assert_eq!(format_age(now - Duration::seconds(59), now), "59s");
        assert_eq!(format_age(now - Duration::seconds(60), now), "1m");
        assert_eq!(format_age(now - Duration::seconds(3599), now), "59m");
        assert_eq!(format_age(now - Duration::hours(23), now), "23h");
        assert_eq!(format_age(now - Duration::hours(25), now), "1d");
    }

    #[test]
    fn test_age_in_future_clamps() {
        let now = now();
        assert_eq!(format_age(now + Duration::seconds(5), now), "0s");
    }

    #[test]
    fn test_namespace_age_without_timestamp() {
        let ns = NamespaceInfo::new("default".to_string(), "Active".to_string());
        assert_eq!(ns.age(now()), "<unknown>");
    }

    #[test]
    fn test_pod_status_from_phase() {
        assert_eq!(PodStatus::from("Running"), PodStatus::Running);
        assert_eq!(PodStatus::from("Evicted"), PodStatus::Unknown);
        assert_eq!(PodStatus::Pending.to_string(), "Pending");
    }
}
