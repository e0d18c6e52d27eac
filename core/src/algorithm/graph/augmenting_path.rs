//! Breadth-first augmenting path search
//!
//! The search walks the residual graph from the source using the lazy arc
//! iterator, so residual edges are derived on demand rather than built up
//! front. Arcs are expanded in edge insertion order, which makes the chosen
//! path a pure function of the network and its current flow.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::residual::residual_arcs;
use crate::algorithm::traits::NodeId;
use crate::data_structures::flow_network::FlowNetwork;

/// Path from source to sink along arcs with positive residual capacity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AugmentingPath {
    nodes: Vec<NodeId>,
}

impl AugmentingPath {
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of hops on the path
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Renders the path as `a -> b -> c` using the given node formatter
    pub fn render(&self, mut name: impl FnMut(&NodeId) -> String) -> String {
        self.nodes
            .iter()
            .map(|id| name(id))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Result of one breadth-first search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSearch {
    /// The path found, or `None` when the sink is unreachable
    pub path: Option<AugmentingPath>,
    /// Nodes dequeued before the search stopped
    pub nodes_explored: usize,
}

/// Searches for an augmenting path between the network's source and sink
pub fn find_augmenting_path(network: &FlowNetwork) -> PathSearch {
    search(network, network.source_index(), network.sink_index())
}

/// Searches for an augmenting path between two arbitrary nodes.
///
/// Returns `None` when either id is unknown to the network.
pub fn find_augmenting_path_between(
    network: &FlowNetwork,
    source: &NodeId,
    sink: &NodeId,
) -> Option<PathSearch> {
    let source = network.index_of(source)?;
    let sink = network.index_of(sink)?;
    Some(search(network, source, sink))
}

fn search(network: &FlowNetwork, source: usize, sink: usize) -> PathSearch {
    let mut parent: Vec<Option<usize>> = vec![None; network.node_count()];
    let mut visited = vec![false; network.node_count()];
    let mut queue = VecDeque::new();
    let mut nodes_explored = 0;

    visited[source] = true;
    queue.push_back(source);

    while let Some(node) = queue.pop_front() {
        nodes_explored += 1;

        if node == sink {
            let path = reconstruct(network, &parent, source, sink);
            trace!(
                "BFS reached sink after exploring {} nodes ({} hops)",
                nodes_explored,
                path.hop_count()
            );
            return PathSearch {
                path: Some(path),
                nodes_explored,
            };
        }

        for arc in residual_arcs(network, node) {
            if !visited[arc.head] {
                visited[arc.head] = true;
                parent[arc.head] = Some(node);
                queue.push_back(arc.head);
            }
        }
    }

    trace!("BFS frontier exhausted after exploring {} nodes", nodes_explored);
    PathSearch {
        path: None,
        nodes_explored,
    }
}

fn reconstruct(network: &FlowNetwork, parent: &[Option<usize>], source: usize, sink: usize) -> AugmentingPath {
    let mut nodes = vec![network.node_id(sink).clone()];
    let mut current = sink;

    while current != source {
        match parent[current] {
            Some(previous) => {
                nodes.push(network.node_id(previous).clone());
                current = previous;
            }
            // Only the source lacks a parent among visited nodes
            None => break,
        }
    }

    nodes.reverse();
    AugmentingPath::new(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::graph::augmentation::augment;

    fn ids(path: &AugmentingPath) -> Vec<&str> {
        path.nodes().iter().map(NodeId::as_str).collect()
    }

    fn classroom() -> FlowNetwork {
        FlowNetwork::builder()
            .node("s")
            .node("a")
            .node("b")
            .node("c")
            .node("d")
            .node("t")
            .edge("s", "a", 10)
            .edge("s", "b", 8)
            .edge("a", "c", 6)
            .edge("a", "b", 4)
            .edge("b", "d", 7)
            .edge("c", "t", 8)
            .edge("c", "d", 2)
            .edge("d", "t", 10)
            .source("s")
            .sink("t")
            .build()
            .unwrap()
    }

    #[test]
    fn test_first_path_follows_insertion_order() {
        let search = find_augmenting_path(&classroom());
        let path = search.path.unwrap();

        assert_eq!(ids(&path), vec!["s", "a", "c", "t"]);
        assert_eq!(path.hop_count(), 3);
        assert_eq!(search.nodes_explored, 6);
    }

    #[test]
    fn test_search_is_deterministic() {
        let network = classroom();
        let first = find_augmenting_path(&network);
        let second = find_augmenting_path(&network.clone());
        assert_eq!(first, second);
    }

    #[test]
    fn test_disconnected_sink_yields_no_path() {
        let network = FlowNetwork::builder()
            .node("s")
            .node("a")
            .node("t")
            .edge("s", "a", 3)
            .source("s")
            .sink("t")
            .build()
            .unwrap();

        let search = find_augmenting_path(&network);
        assert!(search.path.is_none());
        assert_eq!(search.nodes_explored, 2);
    }

    #[test]
    fn test_search_uses_backward_arcs() {
        let mut network = FlowNetwork::builder()
            .node("s")
            .node("a")
            .node("b")
            .node("t")
            .edge("s", "a", 1)
            .edge("s", "b", 1)
            .edge("a", "b", 1)
            .edge("a", "t", 1)
            .edge("b", "t", 1)
            .source("s")
            .sink("t")
            .build()
            .unwrap();

        let zigzag = AugmentingPath::new(vec!["s".into(), "a".into(), "b".into(), "t".into()]);
        augment(&mut network, &zigzag).unwrap();

        let path = find_augmenting_path(&network).path.unwrap();
        assert_eq!(ids(&path), vec!["s", "b", "a", "t"]);
    }

    #[test]
    fn test_search_between_arbitrary_nodes() {
        let network = classroom();

        let search = find_augmenting_path_between(&network, &"a".into(), &"d".into()).unwrap();
        assert_eq!(ids(&search.path.unwrap()), vec!["a", "c", "d"]);

        assert!(find_augmenting_path_between(&network, &"a".into(), &"zz".into()).is_none());
    }

    #[test]
    fn test_render_path() {
        let path = AugmentingPath::new(vec!["s".into(), "t".into()]);
        assert_eq!(path.render(|id| id.to_string()), "s -> t");
    }
}
