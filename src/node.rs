//! Rendering node handles.

use core::sync::atomic::{AtomicU64, Ordering};

use track_core::Attrs;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one live component occurrence, stable across updates.
///
/// Identities are only ever allocated by [`NodeId::next`], so two nodes
/// created separately never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocates a process-unique identifier.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The host's handle for a rendering node: its identity plus its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    attrs: Attrs,
}

impl Node {
    /// Creates a node with a fresh identity.
    #[must_use]
    pub fn new(attrs: Attrs) -> Self {
        Self {
            id: NodeId::next(),
            attrs,
        }
    }

    /// Creates an attribute-less node with a fresh identity.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Attrs::new())
    }

    /// Returns the same node carrying new attributes.
    #[must_use]
    pub fn updated(&self, attrs: Attrs) -> Self {
        Self { id: self.id, attrs }
    }

    /// Node identity.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Node attributes.
    #[must_use]
    pub const fn attrs(&self) -> &Attrs {
        &self.attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fresh_nodes_are_distinct() {
        assert_ne!(Node::empty().id(), Node::empty().id());
    }

    #[test]
    fn constructors_never_reuse_identities() {
        let mut ids = alloc::collections::BTreeSet::new();
        for _ in 0..64 {
            assert!(ids.insert(Node::empty().id()));
            assert!(ids.insert(Node::new(Attrs::new()).id()));
            assert!(ids.insert(NodeId::next()));
        }
    }

    #[test]
    fn update_keeps_identity() {
        let node = Node::empty();
        let attrs = json!({"title": "hello"}).as_object().cloned().unwrap();
        let updated = node.updated(attrs);
        assert_eq!(updated.id(), node.id());
        assert_eq!(updated.attrs().get("title"), Some(&json!("hello")));
    }
}
