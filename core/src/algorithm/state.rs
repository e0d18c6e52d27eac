//! Immutable step snapshots
//!
//! A [`Step`] owns structurally independent copies of the edge flows and the
//! residual graph at the instant it was recorded. Nothing in a step refers
//! back to the live network, so the network can keep mutating while earlier
//! steps stay valid for playback in either direction.

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::augmenting_path::AugmentingPath;
use crate::algorithm::graph::residual::{residual_edges, ResidualEdge};
use crate::algorithm::traits::{Capacity, NodeId};
use crate::data_structures::flow_network::FlowNetwork;

/// Phase of the algorithm a step records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// All flows zero, before the first search
    Initial,
    /// A path was found; flows are still pre-augmentation
    PathFound,
    /// The bottleneck was applied along the path
    FlowAugmented,
    /// No augmenting path remains
    Complete,
}

/// Edge copy with the flow it carried when the step was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    /// Tail node
    pub from: NodeId,
    /// Head node
    pub to: NodeId,
    /// Edge capacity
    pub capacity: Capacity,
    /// Flow at the time of recording
    pub flow: Capacity,
}

/// One recorded state of a max-flow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Phase this step records
    kind: StepKind,
    /// Human-readable account of the step
    description: String,
    /// Every edge with its flow, in insertion order
    edges: Vec<EdgeSnapshot>,
    /// Cumulative flow value at this step
    max_flow_so_far: Capacity,
    /// Augmenting path ids; empty unless `kind` is `PathFound`
    path: Vec<NodeId>,
    /// Path bottleneck; present only on `PathFound` steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bottleneck: Option<Capacity>,
    /// Residual graph derived from `edges`
    residual_edges: Vec<ResidualEdge>,
}

impl Step {
    /// Copies the current state of `network` into a new step
    pub(crate) fn capture(
        kind: StepKind,
        description: String,
        network: &FlowNetwork,
        max_flow_so_far: Capacity,
        path: Option<&AugmentingPath>,
        bottleneck: Option<Capacity>,
    ) -> Self {
        Self {
            kind,
            description,
            edges: snapshot_edges(network),
            max_flow_so_far,
            path: path.map(|p| p.nodes().to_vec()).unwrap_or_default(),
            bottleneck,
            residual_edges: residual_edges(network),
        }
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn edges(&self) -> &[EdgeSnapshot] {
        &self.edges
    }

    pub fn max_flow_so_far(&self) -> Capacity {
        self.max_flow_so_far
    }

    /// Augmenting path of a `PathFound` step; empty otherwise
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub fn bottleneck(&self) -> Option<Capacity> {
        self.bottleneck
    }

    pub fn residual_edges(&self) -> &[ResidualEdge] {
        &self.residual_edges
    }

    /// Flow recorded on the edge `from -> to`, if that edge exists
    pub fn flow_on(&self, from: &str, to: &str) -> Option<Capacity> {
        self.edges
            .iter()
            .find(|edge| edge.from.as_str() == from && edge.to.as_str() == to)
            .map(|edge| edge.flow)
    }
}

/// Deep copy of every edge with its current flow, in insertion order
pub fn snapshot_edges(network: &FlowNetwork) -> Vec<EdgeSnapshot> {
    network
        .edges()
        .iter()
        .map(|edge| EdgeSnapshot {
            from: network.node_id(edge.from_index()).clone(),
            to: network.node_id(edge.to_index()).clone(),
            capacity: edge.capacity(),
            flow: edge.flow(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> FlowNetwork {
        FlowNetwork::builder()
            .node("s")
            .node("t")
            .edge("s", "t", 4)
            .source("s")
            .sink("t")
            .build()
            .unwrap()
    }

    #[test]
    fn test_capture_is_independent_of_network() {
        let mut network = pair();
        let step = Step::capture(StepKind::Initial, "initial state".into(), &network, 0, None, None);

        network.set_flow(0, 4);

        assert_eq!(step.flow_on("s", "t"), Some(0));
        assert_eq!(step.residual_edges().len(), 1);
        assert!(step.path().is_empty());
        assert_eq!(step.bottleneck(), None);
    }

    #[test]
    fn test_path_found_step_carries_path_and_bottleneck() {
        let network = pair();
        let path = AugmentingPath::new(vec!["s".into(), "t".into()]);
        let step = Step::capture(
            StepKind::PathFound,
            "found".into(),
            &network,
            0,
            Some(&path),
            Some(4),
        );

        assert_eq!(step.kind(), StepKind::PathFound);
        assert_eq!(step.path(), path.nodes());
        assert_eq!(step.bottleneck(), Some(4));
    }

    #[test]
    fn test_serialized_shape() {
        let step = Step::capture(StepKind::Complete, "done".into(), &pair(), 0, None, None);
        let value = serde_json::to_value(&step).unwrap();

        assert_eq!(value["kind"], "complete");
        assert_eq!(value["maxFlowSoFar"], 0);
        assert!(value.get("bottleneck").is_none());
        assert_eq!(value["edges"][0]["capacity"], 4);
        assert_eq!(value["residualEdges"][0]["isBackward"], false);
    }
}
