//! Network data structures

pub mod flow_network;

pub use self::flow_network::{
    EdgeSpec, FlowEdge, FlowNetwork, FlowNetworkBuilder, NetworkDefinition, Node, NodeSpec, ValidationError,
};
