//! flowtrace core
//!
//! Edmonds-Karp maximum flow over a validated flow network, recorded as a
//! deterministic sequence of immutable snapshots. Computation and playback
//! are fully separated: [`MaxFlowTraceEngine::run`] produces a complete
//! [`Trace`], and any consumer can index into it without re-running the
//! solver.
//!
//! ```
//! use flowtrace_core::{FlowNetwork, MaxFlowTraceEngine};
//!
//! let network = FlowNetwork::builder()
//!     .node("s")
//!     .node("t")
//!     .edge("s", "t", 4)
//!     .source("s")
//!     .sink("t")
//!     .build()?;
//!
//! let trace = MaxFlowTraceEngine::new(network).run()?;
//! assert_eq!(trace.max_flow(), 4);
//! assert_eq!(trace.len(), 4);
//! # Ok::<(), flowtrace_core::AlgorithmError>(())
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod config;
pub mod data_structures;
pub mod execution;
pub mod validation;

pub use algorithm::{
    AlgorithmError, AugmentingPath, Capacity, ConsistencyFault, EdgeSnapshot, MaxFlowTraceEngine, NodeId,
    ResidualEdge, Step, StepKind, TracedAlgorithm,
};
pub use config::TraceConfig;
pub use data_structures::{EdgeSpec, FlowNetwork, NetworkDefinition, Node, NodeSpec, ValidationError};
pub use execution::{Trace, TraceCursor, TraceMetrics};
pub use validation::{verify_trace, InvariantViolation, MinCut};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
