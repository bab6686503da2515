// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::time::Instant;

use serde_json::Value;
use tracing::debug;

use super::{ClusterApi, ListQuery};
use crate::error::{ListError, Result, Stage};

/// List raw objects for a resolved query.
///
/// The call is bounded by the query's timeout; running out of time is
/// reported as `Timeout`, every other failure as `ListFailed`. Nothing is
/// returned unless the whole list succeeded.
pub async fn list(api: &dyn ClusterApi, query: &ListQuery) -> Result<Vec<Value>> {
    let start = Instant::now();
    debug!(
        coordinate = %query.coordinate,
        namespace = ?query.namespace_scope.as_namespace(),
        label_selector = ?query.label_selector,
        field_selector = ?query.field_selector,
        limit = ?query.limit,
        "Listing resources"
    );

    let items = tokio::time::timeout(query.timeout(), api.list_resources(query))
        .await
        .map_err(|_| ListError::Timeout {
            stage: Stage::List,
            seconds: query.timeout_secs,
        })?
        .map_err(|source| ListError::ListFailed {
            coordinate: query.coordinate.to_string(),
            source,
        })?;

    debug!(
        coordinate = %query.coordinate,
        items = items.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "List complete"
    );

    Ok(items)
}
