//! Edmonds-Karp maximum flow with step tracing
//!
//! The engine owns the live network for the whole run and records a deep
//! snapshot at every observable point: the initial state, each augmenting
//! path before it is applied, the network after each augmentation, and the
//! terminal state. Generation is eager; the returned [`Trace`] is complete
//! before any caller sees a step.
//!
//! Termination follows from BFS path selection: at most O(V·E)
//! augmentations, each adding a positive integer amount.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::time::Instant;

use log::{debug, info};

use crate::algorithm::graph::augmentation::{apply_augmentation, bottleneck, ConsistencyFault};
use crate::algorithm::graph::augmenting_path::{find_augmenting_path, AugmentingPath};
use crate::algorithm::state::{Step, StepKind};
use crate::algorithm::traits::{AlgorithmComplexity, AlgorithmError, Capacity, TracedAlgorithm};
use crate::config::TraceConfig;
use crate::data_structures::flow_network::{FlowNetwork, NetworkDefinition};
use crate::execution::history::{Trace, TraceMetrics};
use crate::validation::correctness::verify_trace;

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    /// Terminal: no augmenting path remains
    Done,
}

/// Max-flow solver that records every intermediate state
#[derive(Debug)]
pub struct MaxFlowTraceEngine {
    /// Live network, mutated by each augmentation
    network: FlowNetwork,
    config: TraceConfig,
    state: EngineState,
    /// Steps recorded so far
    steps: Vec<Step>,
    /// Cumulative flow value
    max_flow: Capacity,
    metrics: TraceMetrics,
}

impl MaxFlowTraceEngine {
    /// Takes exclusive ownership of `network`; its flows are reset to zero
    pub fn new(network: FlowNetwork) -> Self {
        Self::with_config(network, TraceConfig::default())
    }

    pub fn with_config(mut network: FlowNetwork, config: TraceConfig) -> Self {
        network.reset_flows();
        Self {
            network,
            config,
            state: EngineState::Running,
            steps: Vec::new(),
            max_flow: 0,
            metrics: TraceMetrics::default(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Runs the search/augment loop to completion and returns the trace
    pub fn run(mut self) -> Result<Trace, AlgorithmError> {
        let started = Instant::now();

        self.record(StepKind::Initial, "Initial state: all flows are 0".to_owned(), None, None);
        while self.state == EngineState::Running {
            self.advance()?;
        }

        let trace = Trace::new(
            self.network.nodes().to_vec(),
            self.network.source().clone(),
            self.network.sink().clone(),
            self.max_flow,
            self.metrics,
            self.steps,
        );

        if self.config.verify_invariants {
            verify_trace(&trace)?;
        }

        info!(
            "Max flow {} after {} augmentations ({} steps, {} nodes explored) in {:?}",
            trace.max_flow(),
            self.metrics.augmentations,
            trace.len(),
            self.metrics.nodes_explored,
            started.elapsed()
        );

        Ok(trace)
    }

    /// Performs one search and records the resulting step(s)
    fn advance(&mut self) -> Result<(), AlgorithmError> {
        let search = find_augmenting_path(&self.network);
        self.metrics.searches += 1;
        self.metrics.nodes_explored += search.nodes_explored;

        let Some(path) = search.path else {
            self.state = EngineState::Done;
            debug!("No augmenting path after {} searches", self.metrics.searches);
            self.record(
                StepKind::Complete,
                format!("No augmenting path remains; maximum flow is {}", self.max_flow),
                None,
                None,
            );
            return Ok(());
        };

        let amount = bottleneck(&self.network, &path)?;
        let rendered = self.render(&path);
        debug!("Augmenting path {} with bottleneck {}", rendered, amount);

        self.record(
            StepKind::PathFound,
            format!("Found augmenting path {} with bottleneck {}", rendered, amount),
            Some(&path),
            Some(amount),
        );

        apply_augmentation(&mut self.network, &path, amount)?;
        self.max_flow = self
            .max_flow
            .checked_add(amount)
            .ok_or(ConsistencyFault::FlowValueOverflow {
                current: self.max_flow,
                amount,
            })?;
        self.metrics.augmentations += 1;

        self.record(
            StepKind::FlowAugmented,
            format!(
                "Augmented {} units along {}; max flow is now {}",
                amount, rendered, self.max_flow
            ),
            None,
            None,
        );
        Ok(())
    }

    fn record(
        &mut self,
        kind: StepKind,
        description: String,
        path: Option<&AugmentingPath>,
        bottleneck: Option<Capacity>,
    ) {
        let step = Step::capture(kind, description, &self.network, self.max_flow, path, bottleneck);
        self.steps.push(step);
    }

    fn render(&self, path: &AugmentingPath) -> String {
        if self.config.describe_with_labels {
            path.render(|id| {
                self.network
                    .index_of(id)
                    .map_or_else(|| id.to_string(), |index| self.network.node_label(index).to_owned())
            })
        } else {
            path.render(|id| id.to_string())
        }
    }
}

impl TracedAlgorithm for MaxFlowTraceEngine {
    type Output = Trace;

    fn name(&self) -> &'static str {
        "Edmonds-Karp"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(V·E²)",
            space_complexity: "O(S·E) for S recorded steps",
            augmentation_bound: "O(V·E)",
        }
    }

    fn execute(self) -> Result<Trace, AlgorithmError> {
        self.run()
    }
}

/// Validates `definition` and traces its maximum flow with default settings
pub fn trace_max_flow(definition: &NetworkDefinition) -> Result<Trace, AlgorithmError> {
    trace_max_flow_with_config(definition, TraceConfig::default())
}

pub fn trace_max_flow_with_config(
    definition: &NetworkDefinition,
    config: TraceConfig,
) -> Result<Trace, AlgorithmError> {
    let network = FlowNetwork::from_definition(definition)?;
    MaxFlowTraceEngine::with_config(network, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::traits::NodeId;
    use crate::data_structures::flow_network::{EdgeSpec, NodeSpec, ValidationError};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn classroom_definition() -> NetworkDefinition {
        let nodes = ["s", "a", "b", "c", "d", "t"]
            .iter()
            .map(|&id| NodeSpec {
                id: id.into(),
                label: Some(id.to_uppercase()),
            })
            .collect();
        let edges = [
            ("s", "a", 10),
            ("s", "b", 8),
            ("a", "c", 6),
            ("a", "b", 4),
            ("b", "d", 7),
            ("c", "t", 8),
            ("c", "d", 2),
            ("d", "t", 10),
        ]
        .iter()
        .map(|&(from, to, capacity)| EdgeSpec::new(from, to, capacity))
        .collect();

        NetworkDefinition {
            nodes,
            edges,
            source: "s".into(),
            sink: "t".into(),
        }
    }

    fn path_ids(step: &Step) -> Vec<&str> {
        step.path().iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn test_classroom_network_trace() {
        init_logging();
        let config = TraceConfig::default().with_verification(true);
        let trace = trace_max_flow_with_config(&classroom_definition(), config).unwrap();

        assert_eq!(trace.max_flow(), 13);
        assert_eq!(trace.len(), 6);

        let kinds: Vec<_> = trace.iter().map(Step::kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Initial,
                StepKind::PathFound,
                StepKind::FlowAugmented,
                StepKind::PathFound,
                StepKind::FlowAugmented,
                StepKind::Complete,
            ]
        );

        assert_eq!(path_ids(&trace[1]), vec!["s", "a", "c", "t"]);
        assert_eq!(trace[1].bottleneck(), Some(6));
        assert_eq!(trace[1].max_flow_so_far(), 0);
        assert_eq!(trace[2].max_flow_so_far(), 6);

        assert_eq!(path_ids(&trace[3]), vec!["s", "b", "d", "t"]);
        assert_eq!(trace[3].bottleneck(), Some(7));
        assert_eq!(trace[3].max_flow_so_far(), 6);
        assert_eq!(trace[4].max_flow_so_far(), 13);

        let terminal = trace.terminal().unwrap();
        assert_eq!(terminal.max_flow_so_far(), 13);
        assert!(terminal.path().is_empty());
        assert_eq!(terminal.bottleneck(), None);
        assert_eq!(terminal.flow_on("a", "c"), Some(6));
        assert_eq!(terminal.flow_on("b", "d"), Some(7));
        assert!(terminal.description().contains("13"));

        let metrics = trace.metrics();
        assert_eq!(metrics.augmentations, 2);
        assert_eq!(metrics.searches, 3);
    }

    #[test]
    fn test_path_found_step_shows_pre_augmentation_flow() {
        let trace = trace_max_flow(&classroom_definition()).unwrap();

        assert_eq!(trace[1].flow_on("s", "a"), Some(0));
        assert_eq!(trace[2].flow_on("s", "a"), Some(6));
        assert!(trace[2].path().is_empty());
        assert_eq!(trace[2].bottleneck(), None);
        assert!(trace[2].residual_edges().iter().any(|edge| edge.is_backward));
        assert!(trace[0].residual_edges().iter().all(|edge| !edge.is_backward));
    }

    #[test]
    fn test_earlier_steps_are_not_aliased() {
        let trace = trace_max_flow(&classroom_definition()).unwrap();

        // The initial snapshot must still show zero flow after the run
        assert!(trace[0].edges().iter().all(|edge| edge.flow == 0));
        assert_eq!(trace[0].residual_edges().len(), 8);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let first = trace_max_flow(&classroom_definition()).unwrap();
        let second = trace_max_flow(&classroom_definition()).unwrap();
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_labels_in_descriptions() {
        let config = TraceConfig::default().with_labels(true);
        let trace = trace_max_flow_with_config(&classroom_definition(), config).unwrap();

        assert_eq!(
            trace[1].description(),
            "Found augmenting path S -> A -> C -> T with bottleneck 6"
        );
        // Paths always carry ids, whatever the description shows
        assert_eq!(path_ids(&trace[1]), vec!["s", "a", "c", "t"]);
    }

    #[test]
    fn test_disconnected_network_has_two_steps() {
        let network = FlowNetwork::builder()
            .node("s")
            .node("a")
            .node("t")
            .edge("s", "a", 5)
            .source("s")
            .sink("t")
            .build()
            .unwrap();

        let trace = MaxFlowTraceEngine::new(network).run().unwrap();

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.max_flow(), 0);
        assert_eq!(trace[1].kind(), StepKind::Complete);
    }

    #[test]
    fn test_engine_resets_existing_flow() {
        let mut network = FlowNetwork::builder()
            .node("s")
            .node("t")
            .edge("s", "t", 3)
            .source("s")
            .sink("t")
            .build()
            .unwrap();
        network.set_flow(0, 3);

        let engine = MaxFlowTraceEngine::new(network);
        assert_eq!(engine.state(), EngineState::Running);

        let trace = engine.run().unwrap();
        assert_eq!(trace[0].flow_on("s", "t"), Some(0));
        assert_eq!(trace.max_flow(), 3);
    }

    #[test]
    fn test_antiparallel_edges_reach_optimum() {
        let network = FlowNetwork::builder()
            .node("s")
            .node("a")
            .node("b")
            .node("t")
            .edge("s", "a", 1)
            .edge("s", "b", 1)
            .edge("a", "b", 1)
            .edge("a", "t", 1)
            .edge("b", "t", 1)
            .edge("b", "a", 1)
            .source("s")
            .sink("t")
            .build()
            .unwrap();

        let config = TraceConfig::default().with_verification(true);
        let trace = MaxFlowTraceEngine::with_config(network, config).run().unwrap();
        assert_eq!(trace.max_flow(), 2);
    }

    #[test]
    fn test_extreme_capacities_reach_optimum() {
        let network = FlowNetwork::builder()
            .node("s")
            .node("a")
            .node("b")
            .node("t")
            .edge("s", "a", Capacity::MAX)
            .edge("a", "b", Capacity::MAX)
            .edge("b", "a", Capacity::MAX)
            .edge("a", "t", Capacity::MAX - 1)
            .edge("b", "t", Capacity::MAX)
            .source("s")
            .sink("t")
            .build()
            .unwrap();

        let config = TraceConfig::default().with_verification(true);
        let trace = MaxFlowTraceEngine::with_config(network, config).run().unwrap();

        assert_eq!(trace.max_flow(), Capacity::MAX);
        assert_eq!(trace.metrics().augmentations, 2);
    }

    #[test]
    fn test_source_capacity_overflow_is_rejected_before_running() {
        let mut definition = classroom_definition();
        definition.edges = vec![
            EdgeSpec::new("s", "t", Capacity::MAX),
            EdgeSpec::new("s", "a", Capacity::MAX),
            EdgeSpec::new("a", "t", Capacity::MAX),
        ];

        assert_eq!(
            trace_max_flow(&definition),
            Err(AlgorithmError::Validation(ValidationError::CapacityOverflow("s".into())))
        );
    }

    #[test]
    fn test_malformed_definitions_are_rejected() {
        let mut unknown = classroom_definition();
        unknown.edges.push(EdgeSpec::new("a", "zz", 1));
        assert!(matches!(
            trace_max_flow(&unknown),
            Err(AlgorithmError::Validation(ValidationError::UnknownNode { .. }))
        ));

        let mut negative = classroom_definition();
        negative.edges.push(EdgeSpec::new("b", "c", -1));
        assert!(matches!(
            trace_max_flow(&negative),
            Err(AlgorithmError::Validation(ValidationError::NegativeCapacity { .. }))
        ));

        let mut same = classroom_definition();
        same.sink = "s".into();
        assert_eq!(
            trace_max_flow(&same),
            Err(AlgorithmError::Validation(ValidationError::SourceIsSink("s".into())))
        );
    }

    #[test]
    fn test_traced_algorithm_descriptor() {
        let network = FlowNetwork::from_definition(&classroom_definition()).unwrap();
        let engine = MaxFlowTraceEngine::new(network);

        assert_eq!(engine.name(), "Edmonds-Karp");
        assert_eq!(engine.complexity().augmentation_bound, "O(V·E)");
        assert_eq!(engine.execute().unwrap().max_flow(), 13);
    }
}
