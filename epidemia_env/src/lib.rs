//! Epidemia Contact Graph Abstraction Layer
//!
//! This crate provides the topology the epidemic engine runs over. The
//! engine never sees how a graph is stored; it only needs:
//! - Node enumeration in a fixed order (`nodes()`)
//! - Neighbor enumeration (`neighbors()`)
//! - The population size (`node_count()`)
//!
//! Per-node attributes (age, vaccination, risk) deliberately do not live
//! here. The graph remains purely topological.
//!
//! # Example
//!
//! ```
//! use epidemia_env::{generators, ContactGraph, NodeId};
//!
//! let ring = generators::cycle(5);
//! assert_eq!(ring.node_count(), 5);
//! assert_eq!(ring.neighbors(NodeId(0)), &[NodeId(1), NodeId(4)]);
//! ```

mod graph;
mod adjacency;
mod types;
mod error;
pub mod generators;

pub use graph::{ContactGraph, NodeIds};
pub use adjacency::AdjacencyGraph;
pub use types::{Edge, NodeId};
pub use error::GraphError;
