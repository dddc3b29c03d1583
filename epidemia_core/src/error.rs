//! Error types for the epidemic core.

use epidemia_env::GraphError;
use thiserror::Error;

/// Errors raised before or during a simulation run.
///
/// None of these are recoverable inside the engine. A run either completes
/// every day or fails before any day is reported.
#[derive(Debug, Error)]
pub enum SimError {
    /// Parameter outside its documented range (nothing was run)
    #[error("Invalid configuration for `{field}`: {reason}")]
    Configuration {
        field: &'static str,
        reason: String,
    },
    
    /// Population state inconsistent with the graph or with itself
    #[error("Precondition violated: {0}")]
    Precondition(String),
    
    /// Contact graph construction failed
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

impl SimError {
    /// Creates a configuration error for a named parameter.
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            reason: reason.into(),
        }
    }
    
    /// Creates a precondition error.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }
    
    /// Returns true for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Checks that a probability is finite and within [0, 1].
pub(crate) fn check_probability(field: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::config(field, format!("must be within [0, 1], got {}", value)))
    }
}
