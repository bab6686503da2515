// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Normalization of user-supplied list filters
//!
//! Label and field selectors are passed through untouched: the API server is
//! the authority on selector syntax.

use std::time::Duration;

use kube::api::ListParams;
use tracing::trace;

use super::catalog::ResourceCoordinate;

/// Server-side list timeout when the caller does not supply one
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Filters as supplied by the caller, before defaulting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFilters {
    /// Namespace name; empty means all namespaces
    pub namespace: String,
    pub label_selector: Option<String>,
    pub field_selector: Option<String>,
    pub limit: Option<i64>,
    pub timeout_seconds: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    AllNamespaces,
    Namespace(String),
}

impl NamespaceScope {
    pub fn as_namespace(&self) -> Option<&str> {
        match self {
            NamespaceScope::AllNamespaces => None,
            NamespaceScope::Namespace(ns) => Some(ns),
        }
    }
}

/// A fully defaulted list request against one coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub coordinate: ResourceCoordinate,
    pub namespace_scope: NamespaceScope,
    pub label_selector: Option<String>,
    pub field_selector: Option<String>,
    /// Absent means unbounded
    pub limit: Option<u32>,
    /// Always positive
    pub timeout_secs: u64,
}

impl ListQuery {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build kube ListParams for this query
    pub fn list_params(&self) -> ListParams {
        let mut params = ListParams::default();

        if let Some(ref label_sel) = self.label_selector {
            params = params.labels(label_sel);
        }

        if let Some(ref field_sel) = self.field_selector {
            params = params.fields(field_sel);
        }

        if let Some(limit) = self.limit {
            params = params.limit(limit);
        }

        params.timeout = Some(u32::try_from(self.timeout_secs).unwrap_or(u32::MAX));

        trace!(
            label_selector = ?self.label_selector,
            field_selector = ?self.field_selector,
            limit = ?self.limit,
            timeout_secs = self.timeout_secs,
            "Built ListParams"
        );

        params
    }
}

/// Apply defaults to raw filters. Pure and total.
pub fn normalize(coordinate: ResourceCoordinate, filters: &RawFilters) -> ListQuery {
    let namespace = filters.namespace.trim();
    let namespace_scope = if namespace.is_empty() {
        NamespaceScope::AllNamespaces
    } else {
        NamespaceScope::Namespace(namespace.to_string())
    };

    let limit = filters
        .limit
        .filter(|&l| l > 0)
        .map(|l| u32::try_from(l).unwrap_or(u32::MAX));

    let timeout_secs = effective_timeout_secs(filters.timeout_seconds);

    ListQuery {
        coordinate,
        namespace_scope,
        label_selector: non_empty(&filters.label_selector),
        field_selector: non_empty(&filters.field_selector),
        limit,
        timeout_secs,
    }
}

/// Positive timeout in seconds, defaulting when absent or non-positive
pub fn effective_timeout_secs(timeout_seconds: Option<i64>) -> u64 {
    timeout_seconds
        .filter(|&t| t > 0)
        .map(|t| t as u64)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pods() -> ResourceCoordinate {
        ResourceCoordinate {
            group: String::new(),
            version: "v1".to_string(),
            plural_name: "pods".to_string(),
            namespaced: true,
            kind: "Pod".to_string(),
        }
    }

    #[test]
    fn test_defaults() {
        let query = normalize(pods(), &RawFilters::default());
        assert_eq!(query.limit, None);
        assert_eq!(query.timeout_secs, 30);
        assert_eq!(query.namespace_scope, NamespaceScope::AllNamespaces);
        assert_eq!(query.label_selector, None);
        assert_eq!(query.field_selector, None);
    }

    #[test]
    fn test_non_positive_values_fall_back() {
        let filters = RawFilters {
            limit: Some(0),
            timeout_seconds: Some(-5),
            ..Default::default()
        };
        let query = normalize(pods(), &filters);
        assert_eq!(query.limit, None);
        assert_eq!(query.timeout_secs, DEFAULT_TIMEOUT_SECS);

        let filters = RawFilters {
            limit: Some(-1),
            timeout_seconds: Some(0),
            ..Default::default()
        };
        let query = normalize(pods(), &filters);
        assert_eq!(query.limit, None);
        assert_eq!(query.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_supplied_values_are_kept() {
        let filters = RawFilters {
            namespace: "kube-system".to_string(),
            label_selector: Some("app=nginx,tier!=db".to_string()),
            field_selector: Some("status.phase=Running".to_string()),
            limit: Some(50),
            timeout_seconds: Some(120),
        };
        let query = normalize(pods(), &filters);
        assert_eq!(
            query.namespace_scope,
            NamespaceScope::Namespace("kube-system".to_string())
        );
        assert_eq!(query.namespace_scope.as_namespace(), Some("kube-system"));
        assert_eq!(query.label_selector.as_deref(), Some("app=nginx,tier!=db"));
        assert_eq!(query.field_selector.as_deref(), Some("status.phase=Running"));
        assert_eq!(query.limit, Some(50));
        assert_eq!(query.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_empty_selectors_are_dropped() {
        let filters = RawFilters {
            label_selector: Some(String::new()),
            field_selector: Some("  ".to_string()),
            ..Default::default()
        };
        let query = normalize(pods(), &filters);
        assert_eq!(query.label_selector, None);
        assert_eq!(query.field_selector, None);
    }

    #[test]
    fn test_list_params() {
        let filters = RawFilters {
            label_selector: Some("app=web".to_string()),
            field_selector: Some("metadata.name=web-0".to_string()),
            limit: Some(10),
            ..Default::default()
        };
        let params = normalize(pods(), &filters).list_params();
        assert_eq!(params.label_selector.as_deref(), Some("app=web"));
        assert_eq!(params.field_selector.as_deref(), Some("metadata.name=web-0"));
        assert_eq!(params.limit, Some(10));
        assert_eq!(params.timeout, Some(30));
    }

    #[test]
    fn test_list_params_unbounded_without_limit() {
        let params = normalize(pods(), &RawFilters::default()).list_params();
        assert_eq!(params.limit, None);
        assert_eq!(params.label_selector, None);
    }
}
