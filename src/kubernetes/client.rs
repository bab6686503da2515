// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Live cluster access through kube-rs

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use kube::api::{ApiResource, DynamicObject, GroupVersionKind};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use serde_json::Value;
use tracing::{debug, info};

use super::catalog::{ResourceTypeDescriptor, preferred_group_resources};
use super::{ClusterApi, ListQuery, NamespaceScope};

/// Timeout for connecting to K8s API
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A connection to one cluster. Holds no catalog: every operation rediscovers.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    /// Context name, or "default" when the configuration was inferred
    context: String,
}

impl KubeCluster {
    /// Connect using a named kubeconfig context, or infer the configuration
    /// (KUBECONFIG, ~/.kube/config, in-cluster service account) when `None`
    pub async fn connect(context: Option<&str>) -> Result<Self> {
        let (mut config, context_name) = match context {
            Some(name) => {
                let kubeconfig = Kubeconfig::read().context("Failed to read kubeconfig")?;
                if !kubeconfig.contexts.iter().any(|c| c.name == name) {
                    return Err(anyhow!("Context '{}' not found in kubeconfig", name));
                }
                let config = Config::from_custom_kubeconfig(
                    kubeconfig,
                    &KubeConfigOptions {
                        context: Some(name.to_string()),
                        ..Default::default()
                    },
                )
                .await
                .with_context(|| format!("Failed to load kubeconfig for context '{}'", name))?;
                (config, name.to_string())
            }
            None => {
                let config = Config::infer()
                    .await
                    .context("Failed to infer Kubernetes configuration")?;
                (config, "default".to_string())
            }
        };

        // Reads are bounded per operation by the caller's timeout
        config.connect_timeout = Some(CONNECT_TIMEOUT);

        let client = Client::try_from(config)
            .with_context(|| format!("Failed to create client for context '{}'", context_name))?;

        info!(context = %context_name, "Created Kubernetes client");

        Ok(Self {
            client,
            context: context_name,
        })
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    fn api_for(&self, query: &ListQuery) -> (Api<DynamicObject>, &'static str) {
        let coord = &query.coordinate;
        let gvk = GroupVersionKind::gvk(&coord.group, &coord.version, &coord.kind);
        let ar = ApiResource::from_gvk_with_plural(&gvk, &coord.plural_name);
        let client = self.client.clone();

        if coord.namespaced {
            match &query.namespace_scope {
                NamespaceScope::Namespace(ns) => (Api::namespaced_with(client, ns, &ar), "namespaced"),
                NamespaceScope::AllNamespaces => (Api::all_with(client, &ar), "all-namespaces"),
            }
        } else {
            (Api::all_with(client, &ar), "cluster-scoped")
        }
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn fetch_preferred_resource_types(&self) -> Result<Vec<ResourceTypeDescriptor>> {
        let mut descriptors = Vec::new();

        // Legacy core group (/api) comes first
        let core = self
            .client
            .list_core_api_versions()
            .await
            .context("Failed to list core API versions")?;
        if let Some(version) = core.versions.first() {
            let list = self
                .client
                .list_core_api_resources(version)
                .await
                .with_context(|| format!("Failed to list core API resources for {}", version))?;
            descriptors.extend(
                list.resources
                    .iter()
                    .map(|r| ResourceTypeDescriptor::from_api_resource(&list.group_version, r)),
            );
        }

        // Named groups (/apis): every served version, merged per plural name
        let groups = self
            .client
            .list_api_groups()
            .await
            .context("Failed to list API groups")?;
        for group in &groups.groups {
            if group.versions.is_empty() {
                debug!(group = %group.name, "API group advertises no versions");
                continue;
            }
            let mut lists = Vec::with_capacity(group.versions.len());
            for version in &group.versions {
                let list = self
                    .client
                    .list_api_group_resources(&version.group_version)
                    .await
                    .with_context(|| format!("Failed to list resources for {}", version.group_version))?;
                lists.push(list);
            }
            descriptors.extend(preferred_group_resources(group, &lists));
        }

        debug!(
            context = %self.context,
            groups = groups.groups.len() + 1,
            types = descriptors.len(),
            "Discovered preferred resources"
        );

        Ok(descriptors)
    }

    async fn list_resources(&self, query: &ListQuery) -> Result<Vec<Value>> {
        let (api, scope) = self.api_for(query);
        debug!(
            context = %self.context,
            coordinate = %query.coordinate,
            scope = %scope,
            "API scope"
        );

        let list = api
            .list(&query.list_params())
            .await
            .map_err(|e| anyhow!("K8s API error: {}", e))?;

        // The list API doesn't include apiVersion and kind per item
        let api_version = query.coordinate.api_version();
        let kind = &query.coordinate.kind;

        list.items
            .into_iter()
            .map(|item| {
                let mut value =
                    serde_json::to_value(item).context("Failed to serialize resource")?;
                if let Value::Object(ref mut map) = value {
                    map.insert("apiVersion".to_string(), Value::String(api_version.clone()));
                    map.insert("kind".to_string(), Value::String(kind.clone()));
                }
                Ok(value)
            })
            .collect()
    }
}
