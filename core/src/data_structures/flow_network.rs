//! Flow network data structure
//!
//! Nodes and capacitated directed edges live in insertion-ordered arenas and
//! are addressed internally by dense indices. A hash index over ordered
//! `(from, to)` pairs gives O(1) amortized edge lookup, and a per-node
//! incidence list (also in insertion order) lets the path finder derive
//! residual arcs lazily without materializing the residual graph.
//!
//! A `FlowNetwork` can only be obtained through validated construction, so
//! every instance satisfies:
//! - node ids are unique and every edge references existing nodes
//! - no self-loops and at most one edge per ordered pair
//! - capacities are non-negative and `0 <= flow <= capacity`
//! - source and sink are distinct members of the node set
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Capacity, NodeId};

/// Network node with a display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    /// Display name used by labelled descriptions
    pub label: String,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Node entry of a network definition; `label` defaults to the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique identifier
    pub id: NodeId,
    /// Display name; the id when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Edge entry of a network definition. Flow always starts at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// Tail node
    pub from: NodeId,
    /// Head node
    pub to: NodeId,
    /// Maximum flow the edge can carry; must be non-negative
    pub capacity: Capacity,
}

impl EdgeSpec {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, capacity: Capacity) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            capacity,
        }
    }
}

/// Serializable network input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    /// Nodes in insertion order
    pub nodes: Vec<NodeSpec>,
    /// Directed edges in insertion order
    pub edges: Vec<EdgeSpec>,
    /// Node flow originates from
    pub source: NodeId,
    /// Node flow drains into
    pub sink: NodeId,
}

impl NetworkDefinition {
    /// Parses a definition from JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Reasons a network definition is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("duplicate node id '{0}'")]
    DuplicateNode(NodeId),

    #[error("edge {from} -> {to} references unknown node '{missing}'")]
    UnknownNode {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    #[error("duplicate directed edge {from} -> {to}")]
    DuplicateEdge { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} has negative capacity {capacity}")]
    NegativeCapacity {
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
    },

    #[error("self-loop edge on node '{0}'")]
    SelfLoop(NodeId),

    #[error("source node '{0}' is not part of the network")]
    MissingSource(NodeId),

    #[error("sink node '{0}' is not part of the network")]
    MissingSink(NodeId),

    #[error("source and sink are the same node '{0}'")]
    SourceIsSink(NodeId),

    #[error("total capacity leaving source '{0}' exceeds the supported range")]
    CapacityOverflow(NodeId),
}

/// Directed capacitated edge with its current flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEdge {
    /// Tail node index
    pub(crate) from: usize,
    /// Head node index
    pub(crate) to: usize,
    pub(crate) capacity: Capacity,
    /// Current flow, always within `[0, capacity]`
    pub(crate) flow: Capacity,
}

impl FlowEdge {
    /// Index of the tail node
    #[inline]
    pub fn from_index(&self) -> usize {
        self.from
    }

    /// Index of the head node
    #[inline]
    pub fn to_index(&self) -> usize {
        self.to
    }

    #[inline]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    #[inline]
    pub fn flow(&self) -> Capacity {
        self.flow
    }

    /// Unused forward capacity
    #[inline]
    pub fn residual_capacity(&self) -> Capacity {
        self.capacity - self.flow
    }

    /// Flow that can be cancelled by pushing against the edge
    #[inline]
    pub fn reverse_residual_capacity(&self) -> Capacity {
        self.flow
    }
}

/// Validated flow network with a designated source and sink
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    /// Node arena in insertion order
    nodes: Vec<Node>,
    /// Node id to arena index
    node_index: HashMap<NodeId, usize>,
    /// Edge arena in insertion order
    edges: Vec<FlowEdge>,
    /// Ordered `(from, to)` index pair to edge index
    edge_lookup: HashMap<(usize, usize), usize>,
    /// Edge indices touching each node, in edge insertion order
    incidence: Vec<Vec<usize>>,
    /// Source node index
    source: usize,
    /// Sink node index
    sink: usize,
}

impl FlowNetwork {
    /// Builds a network from explicit node and edge lists.
    ///
    /// Either every check passes and a complete network is returned, or the
    /// first violation is reported and nothing is constructed.
    pub fn new(
        nodes: Vec<Node>,
        edges: Vec<EdgeSpec>,
        source: impl Into<NodeId>,
        sink: impl Into<NodeId>,
    ) -> Result<Self, ValidationError> {
        let source = source.into();
        let sink = sink.into();

        let mut node_index = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if node_index.insert(node.id.clone(), index).is_some() {
                return Err(ValidationError::DuplicateNode(node.id.clone()));
            }
        }

        let source_index = *node_index
            .get(&source)
            .ok_or_else(|| ValidationError::MissingSource(source.clone()))?;
        let sink_index = *node_index
            .get(&sink)
            .ok_or_else(|| ValidationError::MissingSink(sink.clone()))?;
        if source_index == sink_index {
            return Err(ValidationError::SourceIsSink(source));
        }

        let mut flow_edges = Vec::with_capacity(edges.len());
        let mut edge_lookup = HashMap::with_capacity(edges.len());
        let mut incidence = vec![Vec::new(); nodes.len()];

        for spec in edges {
            let resolve = |id: &NodeId| {
                node_index
                    .get(id)
                    .copied()
                    .ok_or_else(|| ValidationError::UnknownNode {
                        from: spec.from.clone(),
                        to: spec.to.clone(),
                        missing: id.clone(),
                    })
            };
            let from = resolve(&spec.from)?;
            let to = resolve(&spec.to)?;

            if from == to {
                return Err(ValidationError::SelfLoop(spec.from));
            }
            if spec.capacity < 0 {
                return Err(ValidationError::NegativeCapacity {
                    from: spec.from,
                    to: spec.to,
                    capacity: spec.capacity,
                });
            }

            let edge_index = flow_edges.len();
            if edge_lookup.insert((from, to), edge_index).is_some() {
                return Err(ValidationError::DuplicateEdge {
                    from: spec.from,
                    to: spec.to,
                });
            }

            flow_edges.push(FlowEdge {
                from,
                to,
                capacity: spec.capacity,
                flow: 0,
            });
            incidence[from].push(edge_index);
            incidence[to].push(edge_index);
        }

        // Every flow total kept during a run is bounded by the source capacity
        let source_capacity = flow_edges
            .iter()
            .filter(|edge| edge.from == source_index)
            .try_fold(0 as Capacity, |total, edge| total.checked_add(edge.capacity));
        if source_capacity.is_none() {
            return Err(ValidationError::CapacityOverflow(source));
        }

        Ok(Self {
            nodes,
            node_index,
            edges: flow_edges,
            edge_lookup,
            incidence,
            source: source_index,
            sink: sink_index,
        })
    }

    /// Builds a network from its serializable definition
    pub fn from_definition(definition: &NetworkDefinition) -> Result<Self, ValidationError> {
        let nodes = definition
            .nodes
            .iter()
            .map(|spec| Node {
                id: spec.id.clone(),
                label: spec
                    .label
                    .clone()
                    .unwrap_or_else(|| spec.id.as_str().to_owned()),
            })
            .collect();

        Self::new(
            nodes,
            definition.edges.clone(),
            definition.source.clone(),
            definition.sink.clone(),
        )
    }

    /// Starts a fluent network builder
    pub fn builder() -> FlowNetworkBuilder {
        FlowNetworkBuilder::default()
    }

    /// Sets every edge flow back to zero
    pub fn reset_flows(&mut self) {
        for edge in &mut self.edges {
            edge.flow = 0;
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn source(&self) -> &NodeId {
        &self.nodes[self.source].id
    }

    pub fn sink(&self) -> &NodeId {
        &self.nodes[self.sink].id
    }

    #[inline]
    pub(crate) fn source_index(&self) -> usize {
        self.source
    }

    #[inline]
    pub(crate) fn sink_index(&self) -> usize {
        self.sink
    }

    /// Resolves a node id to its arena index
    #[inline]
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    #[inline]
    pub fn node_id(&self, index: usize) -> &NodeId {
        &self.nodes[index].id
    }

    #[inline]
    pub fn node_label(&self, index: usize) -> &str {
        &self.nodes[index].label
    }

    /// Looks up the edge for an ordered `(from, to)` pair
    pub fn edge(&self, from: &NodeId, to: &NodeId) -> Option<&FlowEdge> {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        self.edge_index_between(from, to).map(|index| &self.edges[index])
    }

    #[inline]
    pub(crate) fn edge_index_between(&self, from: usize, to: usize) -> Option<usize> {
        self.edge_lookup.get(&(from, to)).copied()
    }

    #[inline]
    pub(crate) fn incident_edges(&self, node: usize) -> &[usize] {
        &self.incidence[node]
    }

    #[inline]
    pub(crate) fn edge_at(&self, index: usize) -> &FlowEdge {
        &self.edges[index]
    }

    #[inline]
    pub(crate) fn set_flow(&mut self, index: usize, flow: Capacity) {
        self.edges[index].flow = flow;
    }

    /// Total flow entering a node
    pub fn inflow(&self, node: &NodeId) -> Capacity {
        self.index_of(node).map_or(0, |index| {
            self.incidence[index]
                .iter()
                .map(|&e| &self.edges[e])
                .filter(|edge| edge.to == index)
                .fold(0, |total: Capacity, edge| total.saturating_add(edge.flow))
        })
    }

    /// Total flow leaving a node
    pub fn outflow(&self, node: &NodeId) -> Capacity {
        self.index_of(node).map_or(0, |index| {
            self.incidence[index]
                .iter()
                .map(|&e| &self.edges[e])
                .filter(|edge| edge.from == index)
                .fold(0, |total: Capacity, edge| total.saturating_add(edge.flow))
        })
    }

    /// Net flow leaving the source, i.e. the current flow value
    pub fn flow_value(&self) -> Capacity {
        let source = self.source();
        self.outflow(source).saturating_sub(self.inflow(source))
    }
}

/// Fluent builder for [`FlowNetwork`]
#[derive(Debug, Default, Clone)]
pub struct FlowNetworkBuilder {
    nodes: Vec<Node>,
    edges: Vec<EdgeSpec>,
    source: Option<NodeId>,
    sink: Option<NodeId>,
}

impl FlowNetworkBuilder {
    /// Adds a node whose label equals its id
    pub fn node(self, id: &str) -> Self {
        self.labeled_node(id, id)
    }

    pub fn labeled_node(mut self, id: &str, label: &str) -> Self {
        self.nodes.push(Node::new(id, label));
        self
    }

    pub fn edge(mut self, from: &str, to: &str, capacity: Capacity) -> Self {
        self.edges.push(EdgeSpec::new(from, to, capacity));
        self
    }

    pub fn source(mut self, id: &str) -> Self {
        self.source = Some(NodeId::new(id));
        self
    }

    pub fn sink(mut self, id: &str) -> Self {
        self.sink = Some(NodeId::new(id));
        self
    }

    pub fn build(self) -> Result<FlowNetwork, ValidationError> {
        // An unset terminal is reported as a missing (empty) id
        let source = self.source.unwrap_or_else(|| NodeId::new(""));
        let sink = self.sink.unwrap_or_else(|| NodeId::new(""));
        FlowNetwork::new(self.nodes, self.edges, source, sink)
    }
}
