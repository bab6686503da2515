// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory cluster used by unit tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{Value, json};

use super::{ClusterApi, ListQuery, ResourceTypeDescriptor};

pub fn descriptor(
    group: &str,
    version: &str,
    kind: &str,
    plural: &str,
    aliases: &[&str],
    namespaced: bool,
) -> ResourceTypeDescriptor {
    ResourceTypeDescriptor {
        group: group.to_string(),
        version: version.to_string(),
        kind: kind.to_string(),
        plural_name: plural.to_string(),
        short_aliases: aliases.iter().map(|a| a.to_string()).collect(),
        namespaced,
    }
}

/// A small catalog in server order: core first, then named groups
pub fn sample_catalog() -> Vec<ResourceTypeDescriptor> {
    vec![
        descriptor("", "v1", "Pod", "pods", &["po"], true),
        descriptor("", "v1", "Service", "services", &["svc"], true),
        descriptor("", "v1", "Namespace", "namespaces", &["ns"], false),
        descriptor("apps", "v1", "Deployment", "deployments", &["deploy"], true),
        descriptor("networking.k8s.io", "v1", "Ingress", "ingresses", &["ing"], true),
        descriptor("kustomize.toolkit.fluxcd.io", "v1", "Kustomization", "kustomizations", &["ks"], true),
        descriptor("source.toolkit.fluxcd.io", "v1", "GitRepository", "gitrepositories", &["gitrepo"], true),
        descriptor("helm.toolkit.fluxcd.io", "v2", "HelmRelease", "helmreleases", &["hr"], true),
        descriptor("argoproj.io", "v1alpha1", "Application", "applications", &["app", "apps"], true),
        descriptor("example.com", "v1", "Widget", "widgets", &[], false),
    ]
}

pub fn pod(name: &str, namespace: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {"name": name, "namespace": namespace},
        "status": {
            "phase": "Running",
            "startTime": "2025-01-01T00:00:00Z",
            "containerStatuses": [
                {"name": "app", "ready": true, "restartCount": 2},
                {"name": "sidecar", "ready": true, "restartCount": 0}
            ]
        }
    })
}

pub struct FakeCluster {
    catalog: Vec<ResourceTypeDescriptor>,
    items: Vec<Value>,
    discovery_error: Option<String>,
    list_error: Option<String>,
    delay: Option<Duration>,
    discovery_calls: AtomicUsize,
    last_query: Mutex<Option<ListQuery>>,
}

impl FakeCluster {
    pub fn new(catalog: Vec<ResourceTypeDescriptor>) -> Self {
        Self {
            catalog,
            items: Vec::new(),
            discovery_error: None,
            list_error: None,
            delay: None,
            discovery_calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    pub fn failing_discovery(message: &str) -> Self {
        let mut cluster = Self::new(Vec::new());
        cluster.discovery_error = Some(message.to_string());
        cluster
    }

    pub fn with_items(mut self, items: Vec<Value>) -> Self {
        self.items = items;
        self
    }

    pub fn with_list_error(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    /// Delay every call, to exercise timeouts with a paused clock
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn discovery_calls(&self) -> usize {
        self.discovery_calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<ListQuery> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn fetch_preferred_resource_types(&self) -> anyhow::Result<Vec<ResourceTypeDescriptor>> {
        self.discovery_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.discovery_error {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(self.catalog.clone()),
        }
    }

    async fn list_resources(&self, query: &ListQuery) -> anyhow::Result<Vec<Value>> {
        *self.last_query.lock().unwrap() = Some(query.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.list_error {
            return Err(anyhow!("{}", message));
        }
        Ok(self.items.clone())
    }
}
