//! Flow augmentation along an augmenting path
//!
//! A hop `u -> v` can move flow in two ways: by cancelling flow on the
//! antiparallel edge `v -> u`, or by pushing onto the edge `u -> v`. The
//! augmenter cancels first and pushes the remainder. Every new flow value is
//! computed and bounds-checked before the network is touched, so a failed
//! augmentation leaves the network exactly as it was.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use log::debug;

use crate::algorithm::graph::augmenting_path::AugmentingPath;
use crate::algorithm::graph::residual::hop_residual;
use crate::algorithm::traits::{Capacity, NodeId};
use crate::data_structures::flow_network::FlowNetwork;

/// Inconsistency between a path and the network it is applied to.
///
/// These indicate a defect in path finding or augmentation rather than bad
/// user input; trace generation aborts when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyFault {
    #[error("augmenting path needs at least 2 nodes, got {0}")]
    PathTooShort(usize),

    #[error("augmenting path references unknown node '{0}'")]
    UnknownNode(NodeId),

    #[error("no residual capacity from {from} to {to}")]
    NoResidualCapacity { from: NodeId, to: NodeId },

    #[error("augmentation amount must be positive, got {0}")]
    NonPositiveAmount(Capacity),

    #[error("residual capacity from {from} to {to} exceeds the supported range")]
    CapacityOverflow { from: NodeId, to: NodeId },

    #[error("max flow {current} cannot grow by {amount} within the supported range")]
    FlowValueOverflow { current: Capacity, amount: Capacity },

    #[error("flow on {from} -> {to} would become {flow}, outside [0, {capacity}]")]
    FlowOutOfBounds {
        from: NodeId,
        to: NodeId,
        flow: Capacity,
        capacity: Capacity,
    },
}

/// Resolves the path to arena indices
fn resolve(network: &FlowNetwork, path: &AugmentingPath) -> Result<Vec<usize>, ConsistencyFault> {
    if path.nodes().len() < 2 {
        return Err(ConsistencyFault::PathTooShort(path.nodes().len()));
    }

    path.nodes()
        .iter()
        .map(|id| {
            network
                .index_of(id)
                .ok_or_else(|| ConsistencyFault::UnknownNode(id.clone()))
        })
        .collect()
}

/// Minimum residual capacity over the hops of `path`
pub fn bottleneck(network: &FlowNetwork, path: &AugmentingPath) -> Result<Capacity, ConsistencyFault> {
    let hops = resolve(network, path)?;
    let mut minimum = Capacity::MAX;

    for pair in hops.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let residual = hop_residual(network, from, to)?;
        if residual <= 0 {
            return Err(ConsistencyFault::NoResidualCapacity {
                from: network.node_id(from).clone(),
                to: network.node_id(to).clone(),
            });
        }
        minimum = minimum.min(residual);
    }

    Ok(minimum)
}

/// Moves `amount` units of flow along every hop of `path`.
///
/// Mutates the live network in place; snapshotting is the caller's concern.
pub fn apply_augmentation(
    network: &mut FlowNetwork,
    path: &AugmentingPath,
    amount: Capacity,
) -> Result<(), ConsistencyFault> {
    if amount <= 0 {
        return Err(ConsistencyFault::NonPositiveAmount(amount));
    }
    let hops = resolve(network, path)?;

    // Planned flow per edge index, read back for repeated hops
    let mut planned: HashMap<usize, Capacity> = HashMap::new();
    let mut order = Vec::new();

    for pair in hops.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let mut remaining = amount;

        if let Some(reverse) = network.edge_index_between(to, from) {
            let current = planned
                .get(&reverse)
                .copied()
                .unwrap_or_else(|| network.edge_at(reverse).flow());
            let cancelled = remaining.min(current);
            if cancelled > 0 {
                if planned.insert(reverse, current - cancelled).is_none() {
                    order.push(reverse);
                }
                remaining -= cancelled;
            }
        }

        if remaining == 0 {
            continue;
        }

        let forward = network.edge_index_between(from, to).ok_or_else(|| {
            ConsistencyFault::NoResidualCapacity {
                from: network.node_id(from).clone(),
                to: network.node_id(to).clone(),
            }
        })?;
        let current = planned
            .get(&forward)
            .copied()
            .unwrap_or_else(|| network.edge_at(forward).flow());
        let pushed = current
            .checked_add(remaining)
            .ok_or_else(|| ConsistencyFault::CapacityOverflow {
                from: network.node_id(from).clone(),
                to: network.node_id(to).clone(),
            })?;
        if planned.insert(forward, pushed).is_none() {
            order.push(forward);
        }
    }

    for &index in &order {
        let edge = network.edge_at(index);
        let flow = planned[&index];
        if flow < 0 || flow > edge.capacity() {
            return Err(ConsistencyFault::FlowOutOfBounds {
                from: network.node_id(edge.from_index()).clone(),
                to: network.node_id(edge.to_index()).clone(),
                flow,
                capacity: edge.capacity(),
            });
        }
    }

    for index in order {
        network.set_flow(index, planned[&index]);
    }

    debug!("Augmented {} hops by {}", hops.len() - 1, amount);
    Ok(())
}

/// Computes the bottleneck of `path` and applies it, returning the amount
pub fn augment(network: &mut FlowNetwork, path: &AugmentingPath) -> Result<Capacity, ConsistencyFault> {
    let amount = bottleneck(network, path)?;
    apply_augmentation(network, path, amount)?;
    Ok(amount)
}
