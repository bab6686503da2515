// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Compact per-kind summaries of raw resource objects

use serde::Serialize;
use serde_json::{Map, Value};

use super::accessors::{
    bool_at, int_at, name, namespace, object_at, objects_at, str_at,
};

/// Kinds that get a dedicated summary; everything else is `Generic`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Pod,
    Deployment,
    Service,
    Ingress,
    Generic,
}

impl SummaryKind {
    /// Case-insensitive, exact match on the kind name
    pub fn from_kind(kind: &str) -> Self {
        match kind.to_lowercase().as_str() {
            "pod" => SummaryKind::Pod,
            "deployment" => SummaryKind::Deployment,
            "service" => SummaryKind::Service,
            "ingress" => SummaryKind::Ingress,
            _ => SummaryKind::Generic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceSummary {
    Pod(PodSummary),
    Deployment(DeploymentSummary),
    Service(ServiceSummary),
    Ingress(IngressSummary),
    Generic(GenericSummary),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSummary {
    pub name: String,
    pub namespace: String,
    pub phase: String,
    pub ready: bool,
    pub restart_count: i64,
    pub start_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeploymentSummary {
    pub name: String,
    pub namespace: String,
    pub replicas: i64,
    pub available: i64,
    pub unavailable: i64,
    pub updated: i64,
    pub ready: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(rename = "clusterIP")]
    pub cluster_ip: String,
    pub ports: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngressSummary {
    pub name: String,
    pub namespace: String,
    pub hosts: Vec<String>,
    pub addresses: Vec<String>,
}

/// Name plus the untouched status section
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenericSummary {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Map<String, Value>>,
}

pub fn summarize_pod(item: &Value) -> PodSummary {
    let statuses: Vec<_> = objects_at(item, "status.containerStatuses").collect();
    PodSummary {
        name: name(item),
        namespace: namespace(item),
        phase: string_at(item, "status.phase"),
        start_time: string_at(item, "status.startTime"),
        // An entry without a boolean `ready` does not count against readiness
        ready: statuses
            .iter()
            .all(|cs| bool_at(cs, "ready").unwrap_or(true)),
        restart_count: statuses
            .iter()
            .filter_map(|cs| int_at(cs, "restartCount"))
            .fold(0i64, i64::saturating_add),
    }
}

pub fn summarize_deployment(item: &Value) -> DeploymentSummary {
    let count = |field: &str| int_at(item, &format!("status.{}", field)).unwrap_or(0);
    DeploymentSummary {
        name: name(item),
        namespace: namespace(item),
        replicas: count("replicas"),
        available: count("availableReplicas"),
        unavailable: count("unavailableReplicas"),
        updated: count("updatedReplicas"),
        ready: count("readyReplicas"),
    }
}

pub fn summarize_service(item: &Value) -> ServiceSummary {
    ServiceSummary {
        name: name(item),
        namespace: namespace(item),
        service_type: string_at(item, "spec.type"),
        cluster_ip: string_at(item, "spec.clusterIP"),
        ports: objects_at(item, "spec.ports").map(format_port).collect(),
    }
}

/// `[name:]port[/protocol]`, omitting whichever parts are absent
fn format_port(port: &Value) -> String {
    let mut out = String::new();
    if let Some(name) = str_at(port, "name") {
        out.push_str(name);
        out.push(':');
    }
    if let Some(number) = int_at(port, "port") {
        out.push_str(&number.to_string());
    }
    if let Some(protocol) = str_at(port, "protocol") {
        out.push('/');
        out.push_str(protocol);
    }
    out
}

pub fn summarize_ingress(item: &Value) -> IngressSummary {
    let addresses = objects_at(item, "status.loadBalancer.ingress")
        .flat_map(|entry| [str_at(entry, "ip"), str_at(entry, "hostname")])
        .flatten()
        .map(String::from)
        .collect();
    let hosts = objects_at(item, "spec.rules")
        .filter_map(|rule| str_at(rule, "host"))
        .map(String::from)
        .collect();
    IngressSummary {
        name: name(item),
        namespace: namespace(item),
        hosts,
        addresses,
    }
}

/// `fallback_kind` is used when the item itself carries no kind
pub fn summarize_generic(item: &Value, fallback_kind: &str) -> GenericSummary {
    GenericSummary {
        name: name(item),
        namespace: namespace(item),
        kind: str_at(item, "kind").unwrap_or(fallback_kind).to_string(),
        status: object_at(item, "status").cloned(),
    }
}

fn string_at(item: &Value, path: &str) -> String {
    str_at(item, path).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_kind_matching() {
        let cases = [
            ("Pod", SummaryKind::Pod),
            ("pod", SummaryKind::Pod),
            ("DEPLOYMENT", SummaryKind::Deployment),
            ("Service", SummaryKind::Service),
            ("ingress", SummaryKind::Ingress),
            ("Pods", SummaryKind::Generic),
            ("PodTemplate", SummaryKind::Generic),
            ("IngressClass", SummaryKind::Generic),
            ("", SummaryKind::Generic),
        ];
        for (kind, expected) in cases {
            assert_eq!(SummaryKind::from_kind(kind), expected, "kind {}", kind);
        }
    }

    #[test]
    fn test_pod_readiness_and_restarts() {
        let item = json!({
            "metadata": {"name": "api-7d9f", "namespace": "prod"},
            "status": {
                "phase": "Running",
                "startTime": "2025-03-01T10:00:00Z",
                "containerStatuses": [
                    {"ready": true, "restartCount": 2},
                    {"ready": false, "restartCount": 1}
                ]
            }
        });
        let pod = summarize_pod(&item);
        assert_eq!(pod.name, "api-7d9f");
        assert_eq!(pod.namespace, "prod");
        assert_eq!(pod.phase, "Running");
        assert_eq!(pod.start_time, "2025-03-01T10:00:00Z");
        assert!(!pod.ready);
        assert_eq!(pod.restart_count, 3);
    }

    #[test]
    fn test_pod_without_container_statuses_is_ready() {
        let pending = json!({
            "metadata": {"name": "new", "namespace": "default"},
            "status": {"phase": "Pending"}
        });
        let pod = summarize_pod(&pending);
        assert!(pod.ready);
        assert_eq!(pod.restart_count, 0);
        assert_eq!(pod.start_time, "");

        let empty = json!({"status": {"containerStatuses": []}});
        assert!(summarize_pod(&empty).ready);
    }

    #[test]
    fn test_pod_ignores_malformed_entries() {
        let item = json!({
            "status": {
                "phase": 42,
                "containerStatuses": ["bogus", {"ready": "yes", "restartCount": "many"}, {"ready": true, "restartCount": 4}]
            }
        });
        let pod = summarize_pod(&item);
        assert_eq!(pod.phase, "");
        assert!(pod.ready);
        assert_eq!(pod.restart_count, 4);
    }

    #[test]
    fn test_pod_restart_count_saturates() {
        let item = json!({
            "status": {
                "containerStatuses": [
                    {"ready": true, "restartCount": i64::MAX},
                    {"ready": true, "restartCount": 1},
                    {"ready": true, "restartCount": 1e30}
                ]
            }
        });
        let pod = summarize_pod(&item);
        assert_eq!(pod.restart_count, i64::MAX);
        assert!(pod.ready);
    }

    #[test]
    fn test_deployment_missing_counts_default_to_zero() {
        let item = json!({
            "metadata": {"name": "web", "namespace": "default"},
            "status": {"replicas": 3}
        });
        assert_eq!(
            summarize_deployment(&item),
            DeploymentSummary {
                name: "web".to_string(),
                namespace: "default".to_string(),
                replicas: 3,
                available: 0,
                unavailable: 0,
                updated: 0,
                ready: 0,
            }
        );
    }

    #[test]
    fn test_deployment_full_status() {
        let item = json!({
            "metadata": {"name": "web", "namespace": "default"},
            "status": {
                "replicas": 4,
                "availableReplicas": 3,
                "unavailableReplicas": 1,
                "updatedReplicas": 4,
                "readyReplicas": 3
            }
        });
        let dep = summarize_deployment(&item);
        assert_eq!((dep.replicas, dep.available, dep.unavailable, dep.updated, dep.ready), (4, 3, 1, 4, 3));
    }

    #[test]
    fn test_service_port_formatting() {
        let cases = [
            (json!({"name": "http", "port": 80, "protocol": "TCP"}), "http:80/TCP"),
            (json!({"port": 443}), "443"),
            (json!({"name": "dns", "port": 53}), "dns:53"),
            (json!({"port": 53, "protocol": "UDP"}), "53/UDP"),
            (json!({"name": "metrics"}), "metrics:"),
        ];
        for (port, expected) in cases {
            assert_eq!(format_port(&port), expected);
        }
    }

    #[test]
    fn test_service_summary() {
        let item = json!({
            "metadata": {"name": "web", "namespace": "shop"},
            "spec": {
                "type": "ClusterIP",
                "clusterIP": "10.0.0.12",
                "ports": [{"name": "http", "port": 80, "protocol": "TCP"}, "junk", {"port": 443}]
            }
        });
        let svc = summarize_service(&item);
        assert_eq!(svc.service_type, "ClusterIP");
        assert_eq!(svc.cluster_ip, "10.0.0.12");
        assert_eq!(svc.ports, vec!["http:80/TCP", "443"]);
    }

    #[test]
    fn test_ingress_hosts_without_load_balancer() {
        let item = json!({
            "metadata": {"name": "site", "namespace": "web"},
            "spec": {"rules": [{"host": "a.example.com"}, {"host": "b.example.com"}]}
        });
        let ing = summarize_ingress(&item);
        assert_eq!(ing.hosts, vec!["a.example.com", "b.example.com"]);
        assert!(ing.addresses.is_empty());
    }

    #[test]
    fn test_ingress_addresses_ip_before_hostname() {
        let item = json!({
            "spec": {"rules": [{"http": {}}, {"host": "c.example.com"}]},
            "status": {"loadBalancer": {"ingress": [
                {"ip": "203.0.113.7", "hostname": "lb-1.example.net"},
                {"hostname": "lb-2.example.net"},
                {"ip": "203.0.113.8"}
            ]}}
        });
        let ing = summarize_ingress(&item);
        assert_eq!(
            ing.addresses,
            vec!["203.0.113.7", "lb-1.example.net", "lb-2.example.net", "203.0.113.8"]
        );
        assert_eq!(ing.hosts, vec!["c.example.com"]);
    }

    #[test]
    fn test_generic_keeps_status_verbatim() {
        let item = json!({
            "kind": "Widget",
            "metadata": {"name": "w1"},
            "status": {"phase": "Active"}
        });
        let summary = summarize_generic(&item, "Widget");
        assert_eq!(summary.kind, "Widget");
        assert_eq!(summary.name, "w1");
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"name": "w1", "kind": "Widget", "status": {"phase": "Active"}})
        );
    }

    #[test]
    fn test_generic_falls_back_to_resolved_kind() {
        let item = json!({"metadata": {"name": "cm", "namespace": "default"}});
        let summary = summarize_generic(&item, "ConfigMap");
        assert_eq!(summary.kind, "ConfigMap");
        assert!(summary.status.is_none());
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"name": "cm", "namespace": "default", "kind": "ConfigMap"})
        );
    }

    #[test]
    fn test_summary_field_names() {
        let pod = ResourceSummary::Pod(PodSummary {
            name: "p".to_string(),
            restart_count: 1,
            ..Default::default()
        });
        let value = serde_json::to_value(&pod).unwrap();
        assert!(value.get("restartCount").is_some());
        assert!(value.get("startTime").is_some());

        let svc = ResourceSummary::Service(ServiceSummary::default());
        let value = serde_json::to_value(&svc).unwrap();
        assert!(value.get("clusterIP").is_some());
        assert!(value.get("type").is_some());
    }
}
