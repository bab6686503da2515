// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Error kinds surfaced by the resolution and listing engine.

use std::fmt;

use thiserror::Error;

/// Which network call ran out of time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    List,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Discovery => f.write_str("resource discovery"),
            Stage::List => f.write_str("list"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to discover resources: {source}")]
    CatalogUnavailable {
        #[source]
        source: anyhow::Error,
    },

    #[error("cannot find resource '{kind}'")]
    KindNotFound { kind: String },

    #[error("kind '{kind}' not found in group filter '{group_filter}'")]
    KindNotFoundInGroup { kind: String, group_filter: String },

    /// A descriptor without version or plural name. Never reaches callers:
    /// the resolver reports it as one of the NotFound variants.
    #[error("resource '{plural}' in '{group_version}' has no usable coordinate")]
    MalformedCoordinate {
        group_version: String,
        plural: String,
    },

    #[error("failed to list {coordinate}: {source}")]
    ListFailed {
        coordinate: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{stage} timed out after {seconds}s")]
    Timeout { stage: Stage, seconds: u64 },

    #[error("operation cancelled")]
    Cancelled,
}

impl ListError {
    /// Whether a caller could reasonably retry with a larger window
    pub fn is_timeout(&self) -> bool {
        matches!(self, ListError::Timeout { .. })
    }
}

pub type Result<T, E = ListError> = std::result::Result<T, E>;
