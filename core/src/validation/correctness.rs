//! Correctness verification for recorded traces
//!
//! Checks the invariants every max-flow trace must satisfy using only the
//! recorded snapshots, never the solver: capacity bounds on every step,
//! monotone cumulative flow, conservation and source outflow at the terminal
//! step, and max-flow/min-cut duality.

use std::collections::{HashMap, HashSet, VecDeque};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithm::state::{EdgeSnapshot, Step, StepKind};
use crate::algorithm::traits::{Capacity, NodeId};
use crate::execution::history::Trace;

/// A trace invariant that does not hold
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("trace has no steps")]
    EmptyTrace,

    #[error("trace ends in a {0:?} step instead of a complete step")]
    NotTerminal(StepKind),

    #[error("step {step}: flow {flow} on {from} -> {to} is outside [0, {capacity}]")]
    CapacityBound {
        step: usize,
        from: NodeId,
        to: NodeId,
        flow: Capacity,
        capacity: Capacity,
    },

    #[error("step {step}: max flow decreased from {previous} to {current}")]
    MaxFlowDecreased {
        step: usize,
        previous: Capacity,
        current: Capacity,
    },

    #[error("trace reports max flow {reported} but its terminal step records {recorded}")]
    MaxFlowMismatch { reported: Capacity, recorded: Capacity },

    #[error("flow is not conserved at '{node}': inflow {inflow}, outflow {outflow}")]
    Conservation {
        node: NodeId,
        inflow: Capacity,
        outflow: Capacity,
    },

    #[error("max flow {reported} differs from the net flow {actual} leaving the source")]
    SourceOutflow { reported: Capacity, actual: Capacity },

    #[error("max flow {max_flow} differs from min cut capacity {cut}")]
    MinCutMismatch { max_flow: Capacity, cut: Capacity },
}

/// Source/sink partition derived from a terminal residual graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinCut {
    /// Nodes reachable from the source in the residual graph
    pub source_side: Vec<NodeId>,
    /// Nodes unreachable from the source
    pub sink_side: Vec<NodeId>,
    /// Original edges crossing from the source side to the sink side
    pub cut_edges: Vec<EdgeSnapshot>,
    /// Total capacity of the cut edges
    pub capacity: Capacity,
}

impl MinCut {
    /// Computes the cut from the trace's terminal step
    pub fn from_trace(trace: &Trace) -> Option<Self> {
        let terminal = trace.terminal()?;
        let node_ids: Vec<NodeId> = trace.nodes().iter().map(|node| node.id.clone()).collect();
        Some(Self::from_step(&node_ids, trace.source(), terminal))
    }

    /// Computes the cut induced by residual reachability at `step`
    pub fn from_step(nodes: &[NodeId], source: &NodeId, step: &Step) -> Self {
        let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
        for edge in step.residual_edges() {
            adjacency.entry(&edge.from).or_default().push(&edge.to);
        }

        let mut reachable: HashSet<&NodeId> = HashSet::new();
        let mut queue = VecDeque::new();
        reachable.insert(source);
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            for &next in adjacency.get(node).into_iter().flatten() {
                if reachable.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        let (source_side, sink_side): (Vec<NodeId>, Vec<NodeId>) =
            nodes.iter().cloned().partition(|id| reachable.contains(id));

        let cut_edges: Vec<EdgeSnapshot> = step
            .edges()
            .iter()
            .filter(|edge| reachable.contains(&edge.from) && !reachable.contains(&edge.to))
            .cloned()
            .collect();
        let capacity = cut_edges
            .iter()
            .fold(0, |total: Capacity, edge| total.saturating_add(edge.capacity));

        Self {
            source_side,
            sink_side,
            cut_edges,
            capacity,
        }
    }
}

/// Verifies every trace invariant, reporting the first violation found
pub fn verify_trace(trace: &Trace) -> Result<(), InvariantViolation> {
    let terminal = trace.terminal().ok_or(InvariantViolation::EmptyTrace)?;
    if terminal.kind() != StepKind::Complete {
        return Err(InvariantViolation::NotTerminal(terminal.kind()));
    }

    check_capacity_bounds(trace.steps())?;
    check_monotone_flow(trace.steps())?;

    if trace.max_flow() != terminal.max_flow_so_far() {
        return Err(InvariantViolation::MaxFlowMismatch {
            reported: trace.max_flow(),
            recorded: terminal.max_flow_so_far(),
        });
    }

    let balance = node_balance(terminal.edges());
    for node in trace.nodes() {
        if &node.id == trace.source() || &node.id == trace.sink() {
            continue;
        }
        let (inflow, outflow) = balance.get(&node.id).copied().unwrap_or((0, 0));
        if inflow != outflow {
            return Err(InvariantViolation::Conservation {
                node: node.id.clone(),
                inflow,
                outflow,
            });
        }
    }

    let (source_in, source_out) = balance.get(trace.source()).copied().unwrap_or((0, 0));
    let net_outflow = source_out.saturating_sub(source_in);
    if net_outflow != trace.max_flow() {
        return Err(InvariantViolation::SourceOutflow {
            reported: trace.max_flow(),
            actual: net_outflow,
        });
    }

    // A complete trace always has a terminal step, so the cut exists
    if let Some(cut) = MinCut::from_trace(trace) {
        if cut.capacity != trace.max_flow() {
            return Err(InvariantViolation::MinCutMismatch {
                max_flow: trace.max_flow(),
                cut: cut.capacity,
            });
        }
    }

    Ok(())
}

fn check_capacity_bounds(steps: &[Step]) -> Result<(), InvariantViolation> {
    let violation = steps.par_iter().enumerate().find_map_first(|(index, step)| {
        step.edges()
            .iter()
            .find(|edge| edge.flow < 0 || edge.flow > edge.capacity)
            .map(|edge| InvariantViolation::CapacityBound {
                step: index,
                from: edge.from.clone(),
                to: edge.to.clone(),
                flow: edge.flow,
                capacity: edge.capacity,
            })
    });

    match violation {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

fn check_monotone_flow(steps: &[Step]) -> Result<(), InvariantViolation> {
    for (index, pair) in steps.windows(2).enumerate() {
        let previous = pair[0].max_flow_so_far();
        let current = pair[1].max_flow_so_far();
        if current < previous {
            return Err(InvariantViolation::MaxFlowDecreased {
                step: index + 1,
                previous,
                current,
            });
        }
    }
    Ok(())
}

/// Inflow and outflow per node, saturating at the capacity range
fn node_balance(edges: &[EdgeSnapshot]) -> HashMap<NodeId, (Capacity, Capacity)> {
    let mut balance: HashMap<NodeId, (Capacity, Capacity)> = HashMap::new();
    for edge in edges {
        let out = &mut balance.entry(edge.from.clone()).or_default().1;
        *out = out.saturating_add(edge.flow);
        let inflow = &mut balance.entry(edge.to.clone()).or_default().0;
        *inflow = inflow.saturating_add(edge.flow);
    }
    balance
}
