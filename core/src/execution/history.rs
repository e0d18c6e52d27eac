//! Execution history for max-flow runs
//!
//! A [`Trace`] is the fully materialized record of one run: an ordered array
//! of immutable steps plus the final flow value. Playback is an external
//! index into that array, so seeking in any direction is O(1) and never
//! re-runs the solver. [`TraceCursor`] is a read-only playback position over
//! a borrowed trace.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::algorithm::state::Step;
use crate::algorithm::traits::{Capacity, NodeId};
use crate::data_structures::flow_network::Node;

/// Deterministic counters gathered during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceMetrics {
    /// Augmenting paths applied
    pub augmentations: usize,
    /// Breadth-first searches performed, including the final failing one
    pub searches: usize,
    /// Nodes dequeued across all searches
    pub nodes_explored: usize,
}

/// Ordered, immutable record of a complete max-flow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    /// Network nodes with their labels
    nodes: Vec<Node>,
    source: NodeId,
    sink: NodeId,
    /// Final maximum flow value
    max_flow: Capacity,
    /// Counters gathered during the run
    metrics: TraceMetrics,
    /// Recorded steps, initial first and terminal last
    steps: Vec<Step>,
}

impl Trace {
    pub(crate) fn new(
        nodes: Vec<Node>,
        source: NodeId,
        sink: NodeId,
        max_flow: Capacity,
        metrics: TraceMetrics,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            nodes,
            source,
            sink,
            max_flow,
            metrics,
            steps,
        }
    }

    /// Final maximum flow value
    pub fn max_flow(&self) -> Capacity {
        self.max_flow
    }

    pub fn metrics(&self) -> TraceMetrics {
        self.metrics
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn sink(&self) -> &NodeId {
        &self.sink
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`, or `None` past the end
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// The all-zero state recorded before the first search
    pub fn initial(&self) -> Option<&Step> {
        self.steps.first()
    }

    /// The state recorded once no augmenting path remained
    pub fn terminal(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Starts a playback cursor at the initial step
    pub fn cursor(&self) -> TraceCursor<'_> {
        TraceCursor {
            trace: self,
            position: 0,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Index<usize> for Trace {
    type Output = Step;

    fn index(&self, index: usize) -> &Step {
        &self.steps[index]
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Read-only playback position over a trace
#[derive(Debug, Clone, Copy)]
pub struct TraceCursor<'a> {
    trace: &'a Trace,
    /// Index of the current step
    position: usize,
}

impl<'a> TraceCursor<'a> {
    pub fn position(&self) -> usize {
        self.position
    }

    /// Step under the cursor; `None` only for an empty trace
    pub fn current(&self) -> Option<&'a Step> {
        self.trace.get(self.position)
    }

    /// Jumps to `index`. Out-of-range indices leave the cursor where it was.
    pub fn seek(&mut self, index: usize) -> Option<&'a Step> {
        let step = self.trace.get(index)?;
        self.position = index;
        Some(step)
    }

    /// Moves one step forward; `None` when already at the end
    pub fn step_forward(&mut self) -> Option<&'a Step> {
        self.seek(self.position + 1)
    }

    /// Moves one step back; `None` when already at the start
    pub fn step_back(&mut self) -> Option<&'a Step> {
        let previous = self.position.checked_sub(1)?;
        self.seek(previous)
    }

    pub fn rewind(&mut self) -> Option<&'a Step> {
        self.seek(0)
    }

    pub fn fast_forward(&mut self) -> Option<&'a Step> {
        let last = self.trace.len().checked_sub(1)?;
        self.seek(last)
    }

    pub fn is_at_start(&self) -> bool {
        self.position == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.trace.len()
    }
}
