//! Solve, cut and demo commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flowtrace_core::{
    FlowNetwork, MaxFlowTraceEngine, MinCut, NetworkDefinition, Trace, TraceConfig, TracedAlgorithm,
};
use log::info;

const SAMPLE_NETWORK: &str = include_str!("../data/sample_network.json");

/// Options of the `solve` command
#[derive(Debug, Default)]
pub struct SolveOptions {
    pub output: Option<PathBuf>,
    pub pretty: bool,
    pub labels: bool,
    pub verify: bool,
    pub config: Option<PathBuf>,
}

impl SolveOptions {
    /// Applies command-line flags on top of a loaded configuration
    fn merge_into(&self, mut config: TraceConfig) -> TraceConfig {
        if self.labels {
            config.describe_with_labels = true;
        }
        if self.verify {
            config.verify_invariants = true;
        }
        config
    }
}

/// Run the `solve` command
pub fn run_solve(input: &Path, options: &SolveOptions) -> Result<()> {
    let definition = load_definition(input)?;
    let config = options.merge_into(load_config(options.config.as_deref())?);

    let trace = trace(&definition, config)
        .with_context(|| format!("Failed to trace max flow for {}", input.display()))?;
    let text = render(&trace, options.pretty)?;

    match &options.output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} steps to {}", trace.len(), path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Run the `cut` command
pub fn run_cut(input: &Path) -> Result<()> {
    let definition = load_definition(input)?;
    let trace = trace(&definition, TraceConfig::default().with_verification(true))?;
    let cut = MinCut::from_trace(&trace).context("Trace has no terminal step")?;

    println!("Max flow: {}", trace.max_flow());
    println!("Source side: {}", join(cut.source_side.iter().map(|id| id.to_string())));
    println!("Sink side:   {}", join(cut.sink_side.iter().map(|id| id.to_string())));
    for edge in &cut.cut_edges {
        println!("  {} -> {} ({})", edge.from, edge.to, edge.capacity);
    }
    println!("Cut capacity: {}", cut.capacity);
    Ok(())
}

/// Run the `demo` command
pub fn run_demo(pretty: bool) -> Result<()> {
    let definition = NetworkDefinition::from_json(SAMPLE_NETWORK).context("Bundled sample network is malformed")?;
    let config = TraceConfig::default().with_labels(true).with_verification(true);
    let trace = trace(&definition, config)?;
    println!("{}", render(&trace, pretty)?);
    Ok(())
}

fn load_definition(path: &Path) -> Result<NetworkDefinition> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    NetworkDefinition::from_json(&text).with_context(|| format!("Invalid network definition in {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<TraceConfig> {
    let Some(path) = path else {
        return Ok(TraceConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    TraceConfig::from_json(&text).with_context(|| format!("Invalid trace configuration in {}", path.display()))
}

fn trace(definition: &NetworkDefinition, config: TraceConfig) -> Result<Trace> {
    let network = FlowNetwork::from_definition(definition)?;
    let engine = MaxFlowTraceEngine::with_config(network, config);
    info!("Running {} ({})", engine.name(), engine.complexity());
    Ok(engine.execute()?)
}

fn render(trace: &Trace, pretty: bool) -> Result<String> {
    let text = if pretty {
        trace.to_json_pretty()?
    } else {
        trace.to_json()?
    };
    Ok(text)
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}
