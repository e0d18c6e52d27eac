//! Core algorithm trait definitions for flowtrace
//!
//! This module establishes the identifiers, error taxonomy and the
//! `TracedAlgorithm` interface shared by every component of the solver.
//!
//! # Error taxonomy
//! - [`ValidationError`]: rejected network input, recoverable by the caller
//! - [`ConsistencyFault`]: augmentation went out of bounds, fatal for the run
//! - [`InvariantViolation`]: a finished trace failed verification

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::augmentation::ConsistencyFault;
use crate::data_structures::flow_network::ValidationError;
use crate::validation::correctness::InvariantViolation;

/// Integer capacity and flow values
pub type Capacity = i64;

/// Stable, user-supplied node identifier
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Top-level error type for algorithm operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid network: {0}")]
    Validation(#[from] ValidationError),

    #[error("Consistency fault: {0}")]
    Consistency(#[from] ConsistencyFault),

    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Algorithm complexity information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlgorithmComplexity {
    /// Worst-case running time
    pub time_complexity: &'static str,
    /// Memory held by the recorded output
    pub space_complexity: &'static str,
    /// Upper bound on augmenting iterations
    pub augmentation_bound: &'static str,
}

impl Display for AlgorithmComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time {}, space {}, augmentations {}",
            self.time_complexity, self.space_complexity, self.augmentation_bound
        )
    }
}

/// Algorithm that runs to completion and hands back a recorded output
///
/// # Invariants
/// - Deterministic behavior for given inputs
/// - The output is fully materialized before it is returned
pub trait TracedAlgorithm {
    /// Recorded output of one complete run
    type Output;

    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's asymptotic complexity
    fn complexity(&self) -> AlgorithmComplexity;

    /// Consumes the algorithm and runs it to completion
    fn execute(self) -> Result<Self::Output, AlgorithmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_equality() {
        let a1 = NodeId::new("a");
        let a2: NodeId = "a".into();
        let b = NodeId::from(String::from("b"));

        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert_eq!(a1.as_str(), "a");
        assert_eq!(b.to_string(), "b");
    }

    #[test]
    fn test_node_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&NodeId::new("sink")).unwrap();
        assert_eq!(json, "\"sink\"");

        let back: NodeId = serde_json::from_str("\"s\"").unwrap();
        assert_eq!(back, NodeId::new("s"));
    }

    #[test]
    fn test_error_conversion_from_validation() {
        let err: AlgorithmError = ValidationError::SourceIsSink(NodeId::new("s")).into();
        assert!(matches!(err, AlgorithmError::Validation(_)));
        assert!(err.to_string().contains("source and sink"));
    }
}
