pub mod catalog;
mod client;
pub mod list_options;
pub mod lister;
pub mod resolver;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;

pub use catalog::ResourceTypeDescriptor;
pub use client::KubeCluster;
pub use list_options::{ListQuery, NamespaceScope};

/// Access to a live cluster resource API.
///
/// The engine only ever talks to the cluster through this trait, so tests can
/// substitute an in-memory cluster.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Server-preferred resource types: core group first, then named groups,
    /// in the order the server reports them
    async fn fetch_preferred_resource_types(&self) -> anyhow::Result<Vec<ResourceTypeDescriptor>>;

    /// List raw objects for a resolved coordinate
    async fn list_resources(&self, query: &ListQuery) -> anyhow::Result<Vec<serde_json::Value>>;
}
