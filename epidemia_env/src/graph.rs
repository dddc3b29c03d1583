//! Core contact graph trait consumed by the epidemic engine.

use crate::types::NodeId;

/// The topology interface for epidemic simulation.
///
/// This trait abstracts the contact network so that the engine can run over
/// generated graphs, hand-built fixtures, or graphs loaded by an outer layer.
///
/// # Contract
///
/// - Node ids are the dense range `NodeId(0)..NodeId(node_count())`.
/// - `nodes()` yields ids in ascending order. The engine consumes its random
///   stream in this order, so a fixed order is what makes seeded runs
///   reproducible.
/// - The graph is undirected: `b` is in `neighbors(a)` iff `a` is in
///   `neighbors(b)`.
pub trait ContactGraph {
    /// Returns the number of individuals in the graph.
    fn node_count(&self) -> usize;
    
    /// Returns the neighbors of a node.
    ///
    /// Unknown nodes have no neighbors.
    fn neighbors(&self, node: NodeId) -> &[NodeId];
    
    /// Iterates all node ids in ascending order.
    fn nodes(&self) -> NodeIds {
        NodeIds::new(self.node_count())
    }
    
    /// Returns the number of contacts of a node.
    fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }
    
    /// Returns true if the id belongs to this graph.
    fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }
}

/// Ascending iterator over the node ids of a graph.
#[derive(Debug, Clone)]
pub struct NodeIds {
    next: u32,
    end: u32,
}

impl NodeIds {
    /// Creates an iterator over `NodeId(0)..NodeId(count)`.
    pub fn new(count: usize) -> Self {
        Self {
            next: 0,
            end: count as u32,
        }
    }
}

impl Iterator for NodeIds {
    type Item = NodeId;
    
    fn next(&mut self) -> Option<NodeId> {
        if self.next < self.end {
            let id = NodeId(self.next);
            self.next += 1;
            Some(id)
        } else {
            None
        }
    }
    
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for NodeIds {}
