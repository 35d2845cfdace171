//! Script document: the set of delivery nodes currently attached.
//!
//! Attaching a node is what triggers delivery; detaching it is half of every
//! call's teardown. The document never outlives a settlement with nodes that
//! belong to it.

use crate::domain::correlation::CorrelationId;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use url::Url;

/// Identifier of an attached script node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "script#{}", self.0)
    }
}

/// An attached executable-fetch resource
#[derive(Debug, Clone)]
pub struct ScriptNode {
    pub id: NodeId,
    /// Encoded call URL
    pub src: Url,
    /// Callback this node is expected to invoke
    pub callback: CorrelationId,
    pub attached_at: Instant,
}

/// In-process document holding attached script nodes.
#[derive(Debug, Default)]
pub struct ScriptDocument {
    nodes: DashMap<NodeId, ScriptNode>,
    next_id: AtomicU64,
}

impl ScriptDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a node for `src`.
    pub fn append(&self, src: Url, callback: CorrelationId) -> NodeId {
        let id = NodeId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.nodes.insert(
            id,
            ScriptNode {
                id,
                src,
                callback,
                attached_at: Instant::now(),
            },
        );
        id
    }

    /// Detach a node. Returns it if it was still attached.
    pub fn remove(&self, id: NodeId) -> Option<ScriptNode> {
        self.nodes.remove(&id).map(|(_, node)| node)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of attached nodes addressed to `callback`
    pub fn nodes_for(&self, callback: &CorrelationId) -> usize {
        self.nodes
            .iter()
            .filter(|entry| &entry.value().callback == callback)
            .count()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
