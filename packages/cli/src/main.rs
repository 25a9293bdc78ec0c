use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ptides_sched::adapters::TracingListener;
use ptides_sched::domain::StrategyKind;
use ptides_sched::infrastructure::{load_network, Scenario};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// PTIDES platform scheduler
/// Runs platform scenarios and track rerouting queries
#[derive(Parser)]
#[command(name = "ptides")]
#[command(about = "PTIDES platform scheduling CLI", long_about = None, version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a platform scenario and print the firing report as JSON
    Run {
        /// Scenario file (JSON)
        scenario: PathBuf,
        /// Override the scenario's execution strategy
        #[arg(short, long)]
        strategy: Option<StrategyKind>,
        /// Override the scenario's step limit
        #[arg(long)]
        max_steps: Option<usize>,
    },
    /// Print the cheapest route between two track nodes
    Route {
        /// Network file (JSON)
        network: PathBuf,
        /// Source node name
        from: String,
        /// Destination node name
        to: String,
    },
    /// List available execution strategies
    Strategies,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            strategy,
            max_steps,
        } => run(scenario, strategy, max_steps),
        Commands::Route { network, from, to } => route(network, &from, &to),
        Commands::Strategies => {
            for kind in StrategyKind::ALL {
                println!("{:<22} {}", kind.name(), kind.summary());
            }
            Ok(())
        }
    }
}

fn run(path: PathBuf, strategy: Option<StrategyKind>, max_steps: Option<usize>) -> Result<()> {
    let mut scenario = Scenario::from_path(&path)
        .with_context(|| format!("loading scenario {}", path.display()))?;
    if let Some(kind) = strategy {
        scenario.platform.strategy = kind;
    }
    if let Some(steps) = max_steps {
        scenario.platform.max_steps = steps;
    }
    info!(scenario = %path.display(), strategy = %scenario.platform.strategy, "running");

    let report = scenario
        .into_simulator(TracingListener)
        .run()
        .context("simulation aborted")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn route(path: PathBuf, from: &str, to: &str) -> Result<()> {
    let network =
        load_network(&path).with_context(|| format!("loading network {}", path.display()))?;
    let source = network
        .lookup(from)
        .with_context(|| format!("unknown node '{from}'"))?;
    let dest = network
        .lookup(to)
        .with_context(|| format!("unknown node '{to}'"))?;

    let Some(route) = network.shortest_path(source, dest) else {
        bail!("no route from '{from}' to '{to}'");
    };
    let names: Vec<&str> = route
        .nodes
        .iter()
        .filter_map(|node| network.name(*node))
        .collect();
    println!("{} (cost {})", names.join(" -> "), route.cost);
    Ok(())
}
