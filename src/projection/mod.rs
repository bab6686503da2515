// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Status projection of listed resources
//!
//! Turns raw API objects into compact summaries for the handful of kinds
//! operators look at most, and a name-plus-status view for everything else.
//! Items are only ever borrowed.

pub mod accessors;
pub mod summary;

use serde::Serialize;
use serde_json::Value;

pub use summary::{ResourceSummary, SummaryKind};

/// One output entry: the untouched object, or its summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Projection<'a> {
    Raw(&'a Value),
    Summary(ResourceSummary),
}

/// Project a single item.
///
/// `kind` is the resolved kind of the listed coordinate; `show_details`
/// bypasses summarization entirely.
pub fn project<'a>(kind: &str, item: &'a Value, show_details: bool) -> Projection<'a> {
    if show_details {
        return Projection::Raw(item);
    }
    Projection::Summary(summarize(kind, item))
}

pub fn summarize(kind: &str, item: &Value) -> ResourceSummary {
    match SummaryKind::from_kind(kind) {
        SummaryKind::Pod => ResourceSummary::Pod(summary::summarize_pod(item)),
        SummaryKind::Deployment => ResourceSummary::Deployment(summary::summarize_deployment(item)),
        SummaryKind::Service => ResourceSummary::Service(summary::summarize_service(item)),
        SummaryKind::Ingress => ResourceSummary::Ingress(summary::summarize_ingress(item)),
        SummaryKind::Generic => ResourceSummary::Generic(summary::summarize_generic(item, kind)),
    }
}

/// Project every item of a list
pub fn project_all<'a>(kind: &str, items: &'a [Value], show_details: bool) -> Vec<Projection<'a>> {
    items
        .iter()
        .map(|item| project(kind, item, show_details))
        .collect()
}
