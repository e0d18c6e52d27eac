//! Max-flow graph algorithms: residual derivation, path search,
//! augmentation and the tracing engine

pub mod augmentation;
pub mod augmenting_path;
pub mod max_flow;
pub mod residual;

pub use self::augmentation::{apply_augmentation, augment, bottleneck, ConsistencyFault};
pub use self::augmenting_path::{find_augmenting_path, find_augmenting_path_between, AugmentingPath, PathSearch};
pub use self::max_flow::{trace_max_flow, trace_max_flow_with_config, EngineState, MaxFlowTraceEngine};
pub use self::residual::{residual_edges, ResidualEdge};
