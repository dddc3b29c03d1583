//! Common types for the contact graph abstraction.

use serde::{Deserialize, Serialize};

/// Identifier of an individual in the contact graph.
///
/// Ids are dense: a graph with `n` nodes uses exactly `NodeId(0)..NodeId(n)`.
/// This lets per-node state live in plain vectors indexed by [`NodeId::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Creates a NodeId from a vector index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
    
    /// Returns the position of this node in per-node storage.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An undirected edge, stored with `source < target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    /// Creates a normalized edge (smaller id first).
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { source: a, target: b }
        } else {
            Self { source: b, target: a }
        }
    }
}
