// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Progress reporting for long-running operations
//!
//! The operation reports its discovery and list phases here; the CLI
//! subscribes and drives a spinner.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;

/// Create a spinner with consistent styling
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg} {elapsed:.dim}")
    {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Progress update message
#[derive(Clone, Debug)]
pub enum ProgressUpdate {
    /// Fetching the resource catalog
    Discovering,
    /// Catalog fetched
    DiscoveryComplete { type_count: usize, elapsed_ms: u64 },
    /// Listing a resolved resource type
    Listing { resource: String },
    /// List finished
    ListComplete { items: usize, elapsed_ms: u64 },
}

pub struct ProgressReporter {
    sender: broadcast::Sender<ProgressUpdate>,
    /// Items returned by the most recent list
    items_listed: AtomicUsize,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            sender,
            items_listed: AtomicUsize::new(0),
        }
    }

    /// Subscribe to progress updates
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressUpdate> {
        self.sender.subscribe()
    }

    pub fn discovering(&self) {
        let _ = self.sender.send(ProgressUpdate::Discovering);
    }

    pub fn discovery_complete(&self, type_count: usize, elapsed_ms: u64) {
        let _ = self.sender.send(ProgressUpdate::DiscoveryComplete {
            type_count,
            elapsed_ms,
        });
    }

    pub fn listing(&self, resource: &str) {
        self.items_listed.store(0, Ordering::SeqCst);
        let _ = self.sender.send(ProgressUpdate::Listing {
            resource: resource.to_string(),
        });
    }

    pub fn list_complete(&self, items: usize, elapsed_ms: u64) {
        self.items_listed.store(items, Ordering::SeqCst);
        let _ = self
            .sender
            .send(ProgressUpdate::ListComplete { items, elapsed_ms });
    }

    pub fn items_listed(&self) -> usize {
        self.items_listed.load(Ordering::SeqCst)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle to progress reporter
pub type ProgressHandle = Arc<ProgressReporter>;

pub fn create_progress_handle() -> ProgressHandle {
    Arc::new(ProgressReporter::new())
}
