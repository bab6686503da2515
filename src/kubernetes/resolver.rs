// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resolution of loosely named resource types
//!
//! Resolves a bare word ("pod", "deploy", "svc") or an API group fragment
//! ("flux", "argo") against a catalog snapshot.
//!
//! When several resource types share a name across API groups, the first one
//! in server-reported catalog order wins. The result is reproducible for a
//! given snapshot but may change as the cluster's API groups change; pass a
//! group fragment to pin the group.

use tracing::{debug, warn};

use super::catalog::{ResourceCoordinate, ResourceTypeDescriptor};
use crate::error::{ListError, Result};

/// Resolve `token` (kind, plural or short alias, any case) to a coordinate
pub fn resolve_kind(catalog: &[ResourceTypeDescriptor], token: &str) -> Result<ResourceCoordinate> {
    let target = token.to_lowercase();
    let not_found = || ListError::KindNotFound {
        kind: token.to_string(),
    };

    let found = catalog.iter().find(|d| d.is_named(&target)).ok_or_else(not_found)?;
    debug!(
        token = %token,
        kind = %found.kind,
        group_version = %found.group_version(),
        "Resolved resource kind"
    );

    to_coordinate(found).map_err(|_| not_found())
}

/// Every descriptor whose group/version contains `fragment`, case-insensitively.
/// An empty fragment matches the whole catalog.
pub fn match_group<'a>(
    catalog: &'a [ResourceTypeDescriptor],
    fragment: &str,
) -> Vec<&'a ResourceTypeDescriptor> {
    let target = fragment.to_lowercase();
    catalog
        .iter()
        .filter(|d| d.group_version().to_lowercase().contains(&target))
        .collect()
}

/// Resolve `token` among the descriptors of groups matching `group_filter`
pub fn resolve_in_group(
    catalog: &[ResourceTypeDescriptor],
    group_filter: &str,
    token: &str,
) -> Result<ResourceCoordinate> {
    let target = token.to_lowercase();
    let not_found = || ListError::KindNotFoundInGroup {
        kind: token.to_string(),
        group_filter: group_filter.to_string(),
    };

    let found = match_group(catalog, group_filter)
        .into_iter()
        .find(|d| d.is_named(&target))
        .ok_or_else(not_found)?;
    debug!(
        token = %token,
        group_filter = %group_filter,
        kind = %found.kind,
        group_version = %found.group_version(),
        "Resolved resource kind within group"
    );

    to_coordinate(found).map_err(|_| not_found())
}

fn to_coordinate(descriptor: &ResourceTypeDescriptor) -> Result<ResourceCoordinate> {
    ResourceCoordinate::try_from(descriptor).inspect_err(|e| {
        warn!(kind = %descriptor.kind, error = %e, "Discarding malformed resource coordinate");
    })
}
