//! Contact graph generators.
//!
//! - `empty`: no contacts at all (infection cannot spread)
//! - `cycle`: ring lattice where every node has exactly two contacts
//! - `star`: one hub connected to every other node
//! - `barabasi_albert`: scale-free preferential-attachment network

use crate::adjacency::AdjacencyGraph;
use crate::error::GraphError;
use crate::graph::ContactGraph;
use crate::types::NodeId;
use rand::seq::SliceRandom;
use rand::Rng;

/// Creates `count` nodes with no edges.
pub fn empty(count: usize) -> AdjacencyGraph {
    AdjacencyGraph::with_nodes(count)
}

/// Creates a ring `0 - 1 - ... - (count-1) - 0`.
///
/// Rings of one node have no edges; rings of two nodes have a single edge.
pub fn cycle(count: usize) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::with_nodes(count);
    for i in 0..count {
        let j = (i + 1) % count;
        if i != j {
            let added = graph.add_edge(NodeId::from_index(i), NodeId::from_index(j));
            debug_assert!(added.is_ok(), "ring edge {}-{} rejected", i, j);
        }
    }
    graph
}

/// Creates a star with hub `NodeId(0)` and `leaves` spokes.
pub fn star(leaves: usize) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::with_nodes(leaves + 1);
    for leaf in 1..=leaves {
        let added = graph.add_edge(NodeId(0), NodeId::from_index(leaf));
        debug_assert!(added.is_ok(), "spoke 0-{} rejected", leaf);
    }
    graph
}

/// Generates a Barabási-Albert preferential-attachment graph.
///
/// Growth starts from a star of `edges_per_node + 1` nodes. Each new node
/// attaches to `edges_per_node` distinct existing nodes, chosen with
/// probability proportional to their degree.
///
/// # Arguments
/// * `count` - Total number of nodes
/// * `edges_per_node` - Edges attached from each new node (`m`)
/// * `rng` - Random source (seed it for reproducible topologies)
///
/// # Errors
/// `GraphError::InvalidGenerator` unless `1 <= edges_per_node < count`.
pub fn barabasi_albert<R: Rng + ?Sized>(
    count: usize,
    edges_per_node: usize,
    rng: &mut R,
) -> Result<AdjacencyGraph, GraphError> {
    if edges_per_node < 1 || edges_per_node >= count {
        return Err(GraphError::generator(format!(
            "Barabási-Albert requires 1 <= m < n, got m={} n={}",
            edges_per_node, count
        )));
    }
    
    let mut graph = star(edges_per_node);
    
    // Each node appears once per incident edge (degree-weighted sampling pool)
    let mut repeated_nodes: Vec<NodeId> = Vec::with_capacity(2 * count * edges_per_node);
    for hub_edge in 1..=edges_per_node {
        repeated_nodes.push(NodeId(0));
        repeated_nodes.push(NodeId::from_index(hub_edge));
    }
    
    let mut targets: Vec<NodeId> = Vec::with_capacity(edges_per_node);
    
    while graph.node_count() < count {
        // Distinct targets, kept in draw order for reproducibility
        targets.clear();
        while targets.len() < edges_per_node {
            let candidate = *repeated_nodes
                .choose(rng)
                .ok_or_else(|| GraphError::generator("empty attachment pool"))?;
            if !targets.contains(&candidate) {
                targets.push(candidate);
            }
        }
        
        let source = graph.add_node();
        for &target in &targets {
            graph.add_edge(source, target)?;
        }
        
        repeated_nodes.extend_from_slice(&targets);
        repeated_nodes.extend(std::iter::repeat(source).take(edges_per_node));
    }
    
    Ok(graph)
}
