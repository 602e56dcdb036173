//! Plain-text rendering of inspector results

use chrono::{DateTime, Utc};

use nautilus_types::{ClusterInfo, NamespaceInfo, NodeInfo, PodInfo, ServerVersion};

fn lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn cluster_info(info: &ClusterInfo) -> String {
    let mut out = Vec::new();
    if let Some(count) = info.api_resources {
        out.push(format!("API Resources: {count}"));
    }
    out.push(format!("KubeDNS is running at {}", info.kube_dns_proxy));
    if let Some(ip) = &info.kube_dns_ip {
        out.push(format!("KubeDNS cluster IP: {ip}"));
    }
    out.push(format!(
        "Kubernetes control plane is running at {}",
        info.control_plane
    ));
    lines(out)
}

pub fn server_version(version: &ServerVersion) -> String {
    lines(vec![
        "Kubernetes API Versions:".to_string(),
        format!("Major: {}", version.major),
        format!("Minor: {}", version.minor),
        format!("Platform: {}", version.platform),
        format!("Git Version: {}", version.git_version),
    ])
}

pub fn nodes(nodes: &[NodeInfo]) -> String {
    if nodes.is_empty() {
        return lines(vec!["No nodes found.".to_string()]);
    }

    let mut out = vec!["Cluster Nodes:".to_string()];
    for node in nodes {
        out.push(format!("  Name: {}", node.name));
        out.push(format!("    Status: {}", node.phase));
        out.push(format!("    Kubernetes Version: {}", node.kubelet_version));
        out.push(format!("    OS Image: {}", node.os_image));
        out.push(format!("    Container Runtime: {}", node.container_runtime));
        out.push("    Addresses:".to_string());
        for address in &node.addresses {
            out.push(format!("      {}: {}", address.kind, address.address));
        }
        out.push(String::new());
    }
    lines(out)
}

/// Tab separated table with ages measured against `now`
pub fn namespaces(namespaces: &[NamespaceInfo], now: DateTime<Utc>) -> String {
    let mut out = vec!["NAMESPACE\tSTATUS\tAGE".to_string()];
    for ns in namespaces {
        out.push(format!("{}\t{}\t{}", ns.name, ns.status, ns.age(now)));
    }
    out.push(String::new());
    lines(out)
}

pub fn pods(namespace: &str, pods: &[PodInfo]) -> String {
    let mut out = vec![format!("Pods in namespace '{namespace}':")];
    for pod in pods {
        out.push(format!("Name: {}", pod.name));
        out.push(format!("  Status: {}", pod.status));
        out.push(format!("  IP: {}", pod.pod_ip.as_deref().unwrap_or("<none>")));
        out.push(format!("  Node: {}", pod.node_name.as_deref().unwrap_or("<none>")));
        out.push("---".to_string());
    }
    lines(out)
}
