//! Residual graph derivation
//!
//! The residual graph is never stored. [`residual_edges`] materializes it as
//! a flat list for trace snapshots, while [`residual_arcs`] walks the
//! residual arcs leaving a single node lazily for the path finder.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::augmentation::ConsistencyFault;
use crate::algorithm::traits::{Capacity, NodeId};
use crate::data_structures::flow_network::FlowNetwork;

/// Residual edge as exposed in trace snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidualEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// Remaining forward capacity, or cancellable flow for a backward edge
    pub capacity: Capacity,
    /// Whether the edge reverses an original edge
    pub is_backward: bool,
}

/// Residual arc leaving a node, addressed by arena indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidualArc {
    /// Node the arc leads to
    pub head: usize,
    /// Residual capacity of the arc
    pub capacity: Capacity,
    /// Whether the arc runs against its edge
    pub is_backward: bool,
}

/// Emits every forward residual edge (`capacity - flow > 0`) and every
/// backward residual edge (`flow > 0`, reversed), edge by edge in insertion
/// order with the forward arc first.
pub fn residual_edges(network: &FlowNetwork) -> Vec<ResidualEdge> {
    let mut residual = Vec::with_capacity(network.edge_count() * 2);

    for edge in network.edges() {
        let from = network.node_id(edge.from_index());
        let to = network.node_id(edge.to_index());

        if edge.residual_capacity() > 0 {
            residual.push(ResidualEdge {
                from: from.clone(),
                to: to.clone(),
                capacity: edge.residual_capacity(),
                is_backward: false,
            });
        }
        if edge.reverse_residual_capacity() > 0 {
            residual.push(ResidualEdge {
                from: to.clone(),
                to: from.clone(),
                capacity: edge.reverse_residual_capacity(),
                is_backward: true,
            });
        }
    }

    residual
}

/// Lazily yields the residual arcs leaving `node`, in the insertion order of
/// the edges incident to it.
pub fn residual_arcs(network: &FlowNetwork, node: usize) -> impl Iterator<Item = ResidualArc> + '_ {
    network
        .incident_edges(node)
        .iter()
        .filter_map(move |&index| {
            let edge = network.edge_at(index);
            if edge.from_index() == node && edge.residual_capacity() > 0 {
                Some(ResidualArc {
                    head: edge.to_index(),
                    capacity: edge.residual_capacity(),
                    is_backward: false,
                })
            } else if edge.to_index() == node && edge.reverse_residual_capacity() > 0 {
                Some(ResidualArc {
                    head: edge.from_index(),
                    capacity: edge.reverse_residual_capacity(),
                    is_backward: true,
                })
            } else {
                None
            }
        })
}

/// Capacity available for moving flow from `from` to `to`: the forward
/// residual of `from -> to` plus the flow on `to -> from` that can be
/// cancelled.
pub fn hop_residual(network: &FlowNetwork, from: usize, to: usize) -> Result<Capacity, ConsistencyFault> {
    let forward = network
        .edge_index_between(from, to)
        .map_or(0, |index| network.edge_at(index).residual_capacity());
    let backward = network
        .edge_index_between(to, from)
        .map_or(0, |index| network.edge_at(index).reverse_residual_capacity());
    forward
        .checked_add(backward)
        .ok_or_else(|| ConsistencyFault::CapacityOverflow {
            from: network.node_id(from).clone(),
            to: network.node_id(to).clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> FlowNetwork {
        FlowNetwork::builder()
            .node("s")
            .node("m")
            .node("t")
            .edge("s", "m", 5)
            .edge("m", "t", 3)
            .source("s")
            .sink("t")
            .build()
            .unwrap()
    }

    #[test]
    fn test_zero_flow_has_only_forward_edges() {
        let residual = residual_edges(&chain());

        assert_eq!(residual.len(), 2);
        assert!(residual.iter().all(|edge| !edge.is_backward));
        assert_eq!(residual[0].capacity, 5);
        assert_eq!(residual[1].capacity, 3);
    }

    #[test]
    fn test_partial_and_saturated_flow() {
        let mut network = chain();
        network.set_flow(0, 2); // s -> m partially used
        network.set_flow(1, 3); // m -> t saturated

        let residual = residual_edges(&network);

        assert_eq!(
            residual,
            vec![
                ResidualEdge { from: "s".into(), to: "m".into(), capacity: 3, is_backward: false },
                ResidualEdge { from: "m".into(), to: "s".into(), capacity: 2, is_backward: true },
                ResidualEdge { from: "t".into(), to: "m".into(), capacity: 3, is_backward: true },
            ]
        );
    }

    #[test]
    fn test_zero_capacity_edge_contributes_nothing() {
        let network = FlowNetwork::builder()
            .node("s")
            .node("t")
            .edge("s", "t", 0)
            .source("s")
            .sink("t")
            .build()
            .unwrap();

        assert!(residual_edges(&network).is_empty());
    }

    #[test]
    fn test_lazy_arcs_follow_incidence_order() {
        let mut network = chain();
        network.set_flow(0, 2);

        let m = network.index_of(&"m".into()).unwrap();
        let arcs: Vec<_> = residual_arcs(&network, m).collect();

        assert_eq!(arcs.len(), 2);
        assert!(arcs[0].is_backward);
        assert_eq!(network.node_id(arcs[0].head).as_str(), "s");
        assert!(!arcs[1].is_backward);
        assert_eq!(network.node_id(arcs[1].head).as_str(), "t");
    }

    #[test]
    fn test_hop_residual_combines_antiparallel_edges() {
        let mut network = FlowNetwork::builder()
            .node("s")
            .node("a")
            .node("b")
            .node("t")
            .edge("s", "a", 1)
            .edge("a", "b", 4)
            .edge("b", "a", Capacity::MAX)
            .edge("b", "t", 1)
            .source("s")
            .sink("t")
            .build()
            .unwrap();
        network.set_flow(1, 1); // a -> b
        network.set_flow(2, 2); // b -> a

        let (a, b) = (1, 2);
        assert_eq!(hop_residual(&network, a, b), Ok(3 + 2));
        assert_eq!(hop_residual(&network, b, a), Ok(Capacity::MAX - 2 + 1));

        network.set_flow(2, Capacity::MAX);
        network.set_flow(1, 0);
        assert_eq!(
            hop_residual(&network, a, b),
            Err(ConsistencyFault::CapacityOverflow { from: "a".into(), to: "b".into() })
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let edge = ResidualEdge { from: "a".into(), to: "b".into(), capacity: 1, is_backward: true };
        let json = serde_json::to_string(&edge).unwrap();
        assert_eq!(json, r#"{"from":"a","to":"b","capacity":1,"isBackward":true}"#);
    }
}
