// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resource catalog for Kubernetes clusters.
//!
//! The catalog is the server-preferred set of resource types, fetched fresh
//! for every operation. Nothing here is cached.

use std::fmt;
use std::time::{Duration, Instant};

use std::collections::HashMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIGroup, APIResource, APIResourceList};
use tracing::{debug, info};

use super::ClusterApi;
use crate::error::{ListError, Result, Stage};

/// A resource type registered in the cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTypeDescriptor {
    /// API group (empty string for core v1)
    pub group: String,
    pub version: String,
    /// Canonical PascalCase kind, e.g. "Deployment"
    pub kind: String,
    /// Lowercase plural resource name, e.g. "deployments"
    pub plural_name: String,
    /// Short names advertised by the server ("deploy", "svc", ...)
    pub short_aliases: Vec<String>,
    pub namespaced: bool,
}

impl ResourceTypeDescriptor {
    /// Build a descriptor from one entry of a discovery APIResourceList
    pub fn from_api_resource(group_version: &str, resource: &APIResource) -> Self {
        let (group, version) = split_group_version(group_version);
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: resource.kind.clone(),
            plural_name: resource.name.clone(),
            short_aliases: resource.short_names.clone().unwrap_or_default(),
            namespaced: resource.namespaced,
        }
    }

    /// The `group/version` string, or the bare version for the core group
    pub fn group_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// True if `token` names this type by plural, kind or short alias.
    /// `token` must already be lowercase.
    pub fn is_named(&self, token: &str) -> bool {
        self.plural_name.to_lowercase() == token
            || self.kind.to_lowercase() == token
            || self
                .short_aliases
                .iter()
                .any(|alias| alias.to_lowercase() == token)
    }

    pub fn is_subresource(&self) -> bool {
        self.plural_name.contains('/')
    }
}

/// Split "apps/v1" into ("apps", "v1") and "v1" into ("", "v1")
pub fn split_group_version(group_version: &str) -> (&str, &str) {
    match group_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", group_version),
    }
}

/// Exact, queryable location of a resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCoordinate {
    pub group: String,
    pub version: String,
    pub plural_name: String,
    pub namespaced: bool,
    /// Kind of the owning descriptor, used to stamp list items and pick a projection
    pub kind: String,
}

impl ResourceCoordinate {
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl TryFrom<&ResourceTypeDescriptor> for ResourceCoordinate {
    type Error = ListError;

    fn try_from(descriptor: &ResourceTypeDescriptor) -> Result<Self> {
        if descriptor.version.is_empty() || descriptor.plural_name.is_empty() {
            return Err(ListError::MalformedCoordinate {
                group_version: descriptor.group_version(),
                plural: descriptor.plural_name.clone(),
            });
        }
        Ok(Self {
            group: descriptor.group.clone(),
            version: descriptor.version.clone(),
            plural_name: descriptor.plural_name.clone(),
            namespaced: descriptor.namespaced,
            kind: descriptor.kind.clone(),
        })
    }
}

impl fmt::Display for ResourceCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_version(), self.plural_name)
    }
}

/// Merge the resource lists of every version a group serves.
///
/// Each plural name appears once: the first version that serves it wins,
/// unless the group's preferred version also serves it. Output follows the
/// order of `lists`, then resource order within each list.
pub fn preferred_group_resources(
    group: &APIGroup,
    lists: &[APIResourceList],
) -> Vec<ResourceTypeDescriptor> {
    let preferred = group
        .preferred_version
        .as_ref()
        .map(|v| v.group_version.as_str());

    let mut chosen: HashMap<&str, &str> = HashMap::new();
    for list in lists {
        for resource in &list.resources {
            let is_preferred = preferred == Some(list.group_version.as_str());
            if is_preferred || !chosen.contains_key(resource.name.as_str()) {
                chosen.insert(resource.name.as_str(), list.group_version.as_str());
            }
        }
    }

    let chosen = &chosen;
    lists
        .iter()
        .flat_map(move |list| {
            list.resources
                .iter()
                .filter(move |r| chosen.get(r.name.as_str()) == Some(&list.group_version.as_str()))
                .map(move |r| ResourceTypeDescriptor::from_api_resource(&list.group_version, r))
        })
        .collect()
}

/// Fetch the complete server-preferred resource catalog.
///
/// One discovery pass per call, bounded by `timeout`. Failures are wrapped as
/// `CatalogUnavailable` and never retried here.
pub async fn fetch_catalog(
    api: &dyn ClusterApi,
    timeout: Duration,
) -> Result<Vec<ResourceTypeDescriptor>> {
    let start = Instant::now();
    let descriptors = tokio::time::timeout(timeout, api.fetch_preferred_resource_types())
        .await
        .map_err(|_| ListError::Timeout {
            stage: Stage::Discovery,
            seconds: timeout.as_secs(),
        })?
        .map_err(|source| ListError::CatalogUnavailable { source })?;

    // Subresources (pods/log, deployments/scale) are not listable types
    let catalog: Vec<_> = descriptors
        .into_iter()
        .filter(|d| !d.is_subresource())
        .collect();

    info!(
        types = catalog.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Fetched resource catalog"
    );
    debug!(
        groups = ?catalog
            .iter()
            .map(ResourceTypeDescriptor::group_version)
            .collect::<std::collections::BTreeSet<_>>(),
        "Catalog group versions"
    );

    Ok(catalog)
}
