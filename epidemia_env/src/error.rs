//! Error types for the contact graph layer.

use thiserror::Error;

/// Errors that can occur while building or generating a contact graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Referenced node is not part of the graph
    #[error("Unknown node: {0}")]
    UnknownNode(String),
    
    /// Edge from a node to itself
    #[error("Self loop on node {0}")]
    SelfLoop(String),
    
    /// Generator called with parameters it cannot satisfy
    #[error("Invalid generator parameters: {0}")]
    InvalidGenerator(String),
}

impl GraphError {
    /// Creates an unknown-node error.
    pub fn unknown(node: impl std::fmt::Display) -> Self {
        Self::UnknownNode(node.to_string())
    }
    
    /// Creates an invalid-generator error.
    pub fn generator(msg: impl Into<String>) -> Self {
        Self::InvalidGenerator(msg.into())
    }
}
