//! Adjacency-list implementation of ContactGraph.

use crate::error::GraphError;
use crate::graph::ContactGraph;
use crate::types::{Edge, NodeId};

/// Undirected contact graph backed by per-node neighbor lists.
///
/// Neighbor lists keep insertion order, so two graphs built by the same
/// sequence of `add_edge` calls enumerate neighbors identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyGraph {
    /// Adjacency list: node index -> neighbor ids
    adjacency: Vec<Vec<NodeId>>,
    
    /// Number of undirected edges
    edge_count: usize,
}

impl AdjacencyGraph {
    /// Creates a graph with `count` isolated nodes.
    pub fn with_nodes(count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); count],
            edge_count: 0,
        }
    }
    
    /// Builds a graph from an edge list.
    pub fn from_edges(count: usize, edges: &[(u32, u32)]) -> Result<Self, GraphError> {
        let mut graph = Self::with_nodes(count);
        for &(a, b) in edges {
            graph.add_edge(NodeId(a), NodeId(b))?;
        }
        Ok(graph)
    }
    
    /// Appends a new isolated node and returns its id.
    pub fn add_node(&mut self) -> NodeId {
        self.adjacency.push(Vec::new());
        NodeId::from_index(self.adjacency.len() - 1)
    }
    
    /// Adds an undirected edge.
    ///
    /// # Returns
    /// * `Ok(true)` - Edge was inserted
    /// * `Ok(false)` - Edge already existed (graph unchanged)
    /// * `Err(_)` - Self loop or unknown endpoint
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool, GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a.to_string()));
        }
        for node in [a, b] {
            if !self.contains(node) {
                return Err(GraphError::unknown(node));
            }
        }
        if self.has_edge(a, b) {
            return Ok(false);
        }
        
        self.adjacency[a.index()].push(b);
        self.adjacency[b.index()].push(a);
        self.edge_count += 1;
        Ok(true)
    }
    
    /// Returns true if `a` and `b` are in contact.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        // Scan the shorter list
        let (from, to) = if self.degree(a) <= self.degree(b) { (a, b) } else { (b, a) };
        self.neighbors(from).contains(&to)
    }
    
    /// Returns the number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
    
    /// Returns every undirected edge exactly once, ordered by source id.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (index, neighbors) in self.adjacency.iter().enumerate() {
            let source = NodeId::from_index(index);
            for &target in neighbors {
                if source < target {
                    edges.push(Edge::new(source, target));
                }
            }
        }
        edges
    }
}

impl ContactGraph for AdjacencyGraph {
    fn node_count(&self) -> usize {
        self.adjacency.len()
    }
    
    fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency
            .get(node.index())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
