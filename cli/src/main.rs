//! flowtrace CLI - traces Edmonds-Karp max flow over a JSON network
//!
//! # Commands
//! - `flowtrace solve <network.json>` - Run the solver and write the trace as JSON
//! - `flowtrace cut <network.json>` - Print the minimum cut
//! - `flowtrace demo` - Trace the bundled six-node sample network
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod solve;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::solve::SolveOptions;

/// flowtrace command-line interface
#[derive(Parser)]
#[command(name = "flowtrace")]
#[command(author, version, about = "Edmonds-Karp max flow with a replayable step trace")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace the maximum flow of a network definition
    Solve {
        /// Network definition (JSON)
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the trace JSON
        #[arg(long)]
        pretty: bool,

        /// Use node labels in step descriptions
        #[arg(long)]
        labels: bool,

        /// Verify trace invariants before writing
        #[arg(long)]
        verify: bool,

        /// Trace configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the minimum cut of a network definition
    Cut {
        /// Network definition (JSON)
        input: PathBuf,
    },

    /// Trace the bundled sample network
    Demo {
        /// Pretty-print the trace JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            input,
            output,
            pretty,
            labels,
            verify,
            config,
        } => {
            let options = SolveOptions {
                output,
                pretty,
                labels,
                verify,
                config,
            };
            solve::run_solve(&input, &options)
        }
        Commands::Cut { input } => solve::run_cut(&input),
        Commands::Demo { pretty } => solve::run_demo(pretty),
    }
}

fn init_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}
