// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! The `list_resources` operation
//!
//! Takes the untyped argument object handed over by the dispatch layer,
//! picks one of three modes and runs the discovery, resolve, list and
//! project pipeline against a cluster.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{ListError, Result};
use crate::kubernetes::catalog::{ResourceTypeDescriptor, fetch_catalog};
use crate::kubernetes::list_options::{RawFilters, effective_timeout_secs, normalize};
use crate::kubernetes::resolver::{match_group, resolve_in_group, resolve_kind};
use crate::kubernetes::{ClusterApi, lister};
use crate::progress::ProgressReporter;
use crate::projection::project_all;

pub const OPERATION_NAME: &str = "list_resources";

/// Kind token that, together with a group filter, asks for discovery
const DISCOVER_ALL: &str = "all";

static KIND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9.\-]{0,252})$").unwrap());

/// DNS-1123 label
static NAMESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$").unwrap());

static SELECTOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-_./=!<>,() ]*$").unwrap());

/// Parsed and validated operation arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResourcesInput {
    pub kind: Option<String>,
    pub group_filter: String,
    pub filters: RawFilters,
    pub show_details: bool,
}

/// Which of the three pipelines an input selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode<'a> {
    /// Describe every resource type in matching groups; nothing is listed
    Discovery { group_filter: &'a str },
    /// Resolve the kind only among matching groups
    FilteredKind { group_filter: &'a str, kind: &'a str },
    /// Resolve the kind against the whole catalog
    Direct { kind: &'a str },
}

impl ListResourcesInput {
    /// Parse the dispatch layer's argument object. Values of the wrong JSON
    /// type are treated as absent.
    pub fn from_args(args: &Map<String, Value>) -> Result<Self> {
        let string = |key: &str| args.get(key).and_then(Value::as_str).map(str::to_string);
        let number = |key: &str| args.get(key).and_then(Value::as_f64).map(|n| n as i64);

        let group_filter = string("groupFilter").unwrap_or_default();

        let kind = string("kind").filter(|k| !k.is_empty());
        match &kind {
            Some(kind) if !KIND_PATTERN.is_match(kind) => {
                return Err(ListError::InvalidArgument(format!(
                    "invalid kind '{}': expected a resource name such as Pod, deploy or certificates.cert-manager.io",
                    kind
                )));
            }
            None if group_filter.is_empty() => {
                return Err(ListError::InvalidArgument(
                    "kind must be provided when groupFilter is not specified".to_string(),
                ));
            }
            _ => {}
        }

        let namespace = string("namespace").unwrap_or_default();
        if !namespace.is_empty() && !NAMESPACE_PATTERN.is_match(&namespace) {
            return Err(ListError::InvalidArgument(format!(
                "invalid namespace '{}': must be a lowercase RFC 1123 label",
                namespace
            )));
        }

        let label_selector = string("labelSelector");
        if let Some(selector) = &label_selector
            && !SELECTOR_PATTERN.is_match(selector)
        {
            return Err(ListError::InvalidArgument(format!(
                "invalid labelSelector '{}'",
                selector
            )));
        }

        Ok(Self {
            kind,
            group_filter,
            filters: RawFilters {
                namespace,
                label_selector,
                field_selector: string("fieldSelector"),
                limit: number("limit"),
                timeout_seconds: number("timeoutSeconds"),
            },
            show_details: args
                .get("showDetails")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }

    pub fn mode(&self) -> Mode<'_> {
        let kind = self.kind.as_deref().unwrap_or_default();
        if self.group_filter.is_empty() {
            Mode::Direct { kind }
        } else if kind.is_empty() || kind.eq_ignore_ascii_case(DISCOVER_ALL) {
            Mode::Discovery {
                group_filter: &self.group_filter,
            }
        } else {
            Mode::FilteredKind {
                group_filter: &self.group_filter,
                kind,
            }
        }
    }
}

/// One resource type in a discovery listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredType {
    pub kind: String,
    /// group/version
    pub group: String,
    /// Plural resource name
    pub resource: String,
    pub namespaced: bool,
    pub short_names: Vec<String>,
}

impl From<&ResourceTypeDescriptor> for DiscoveredType {
    fn from(d: &ResourceTypeDescriptor) -> Self {
        Self {
            kind: d.kind.clone(),
            group: d.group_version(),
            resource: d.plural_name.clone(),
            namespaced: d.namespaced,
            short_names: d.short_aliases.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryListing {
    pub group_filter: String,
    pub discovered_types: Vec<DiscoveredType>,
    pub total_found: usize,
    pub message: String,
}

impl DiscoveryListing {
    pub fn new(catalog: &[ResourceTypeDescriptor], group_filter: &str) -> Self {
        let discovered_types: Vec<DiscoveredType> = match_group(catalog, group_filter)
            .into_iter()
            .map(DiscoveredType::from)
            .collect();
        let total_found = discovered_types.len();
        let message = if total_found == 0 {
            format!("No resources found for group filter '{}'", group_filter)
        } else {
            format!(
                "Found {} resource types matching group filter '{}'",
                total_found, group_filter
            )
        };
        Self {
            group_filter: group_filter.to_string(),
            discovered_types,
            total_found,
            message,
        }
    }
}

/// Listed items, projected when serialized
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceList {
    /// Resolved kind of the listed coordinate
    pub kind: String,
    pub items: Vec<Value>,
    pub show_details: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    Discovery(DiscoveryListing),
    Resources(ResourceList),
}

impl Serialize for OperationOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            OperationOutput::Discovery(listing) => listing.serialize(serializer),
            OperationOutput::Resources(list) => {
                project_all(&list.kind, &list.items, list.show_details).serialize(serializer)
            }
        }
    }
}

/// Run `list_resources` against a cluster.
///
/// One catalog fetch, at most one list call. Either call failing fails the
/// whole operation; no partial results are returned.
pub async fn execute(
    api: &dyn ClusterApi,
    input: &ListResourcesInput,
    progress: &ProgressReporter,
) -> Result<OperationOutput> {
    let timeout = Duration::from_secs(effective_timeout_secs(input.filters.timeout_seconds));

    progress.discovering();
    let start = Instant::now();
    let catalog = fetch_catalog(api, timeout).await?;
    progress.discovery_complete(catalog.len(), start.elapsed().as_millis() as u64);

    let coordinate = match input.mode() {
        Mode::Discovery { group_filter } => {
            let listing = DiscoveryListing::new(&catalog, group_filter);
            info!(
                group_filter = %group_filter,
                found = listing.total_found,
                "Group discovery"
            );
            return Ok(OperationOutput::Discovery(listing));
        }
        Mode::FilteredKind { group_filter, kind } => resolve_in_group(&catalog, group_filter, kind)?,
        Mode::Direct { kind } => resolve_kind(&catalog, kind)?,
    };

    let query = normalize(coordinate, &input.filters);
    progress.listing(&query.coordinate.to_string());
    let start = Instant::now();
    let items = lister::list(api, &query).await?;
    progress.list_complete(items.len(), start.elapsed().as_millis() as u64);

    info!(
        kind = %query.coordinate.kind,
        coordinate = %query.coordinate,
        namespace = ?query.namespace_scope.as_namespace(),
        items = items.len(),
        show_details = input.show_details,
        "Listed resources"
    );

    Ok(OperationOutput::Resources(ResourceList {
        kind: query.coordinate.kind,
        items,
        show_details: input.show_details,
    }))
}

/// Run `list_resources` until `shutdown` resolves.
///
/// Shutdown drops the operation, aborting whichever call is in flight, and
/// reports `Cancelled` instead of any partial result.
pub async fn execute_until<F>(
    api: &dyn ClusterApi,
    input: &ListResourcesInput,
    progress: &ProgressReporter,
    shutdown: F,
) -> Result<OperationOutput>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        result = execute(api, input, progress) => result,
        () = shutdown => {
            warn!(operation = OPERATION_NAME, "Cancelled");
            Err(ListError::Cancelled)
        }
    }
}
