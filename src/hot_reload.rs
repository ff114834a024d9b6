//! Cache invalidation for development reloads.
//!
//! When a class behind a loader path changes, the nodes that resolved it must
//! drop their instances so the next render picks up the new class.

use crate::{host::Host, node::NodeId};

/// What to reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reload {
    /// Every node.
    All,
    /// One node.
    Node(NodeId),
    /// Every node whose resolution consulted this loader path.
    Source(String),
}

impl Host {
    /// Drops the cached resolutions selected by `reload`.
    ///
    /// Returns the number of nodes affected. Live components re-resolve on
    /// their next render.
    pub fn reload(&self, reload: Reload) -> usize {
        let cache = self.cache();
        let dropped = match &reload {
            Reload::All => cache.invalidate_all(),
            Reload::Node(id) => usize::from(cache.invalidate(*id)),
            Reload::Source(path) => cache.invalidate_source(path),
        };
        tracing::info!(?reload, dropped, "hot reload");
        dropped
    }
}
