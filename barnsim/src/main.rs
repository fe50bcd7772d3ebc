//! # barnsim - headless dairy-barn simulator
//!
//! One command, physics + herd behaviour, no window.
//!
//! Usage:
//!   barnsim                                  # Built-in demo barn
//!   barnsim --scenario my_barn.yaml          # Custom scenario
//!   barnsim --ticks 36000 --cows 20          # Override run length / herd
//!   barnsim --seed 36                        # Deterministic replay

use anyhow::{Context, Result};
use barnsim_core::{Barn, ScenarioConfig};
use clap::Parser;
use tracing::info;

/// CLI arguments
#[derive(Parser)]
#[command(name = "barnsim")]
#[command(about = "Headless 2D dairy-barn behaviour simulator")]
struct Args {
    /// Scenario file (YAML)
    #[arg(long)]
    scenario: Option<String>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 6000)]
    ticks: u64,

    /// Override the scenario's herd size
    #[arg(long)]
    cows: Option<usize>,

    /// Override the scenario's RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective scenario as YAML and exit
    #[arg(long)]
    dump_scenario: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut config = match &args.scenario {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading scenario {path}"))?;
            ScenarioConfig::from_yaml(&source)
                .with_context(|| format!("parsing scenario {path}"))?
        }
        None => ScenarioConfig::default(),
    };
    if let Some(cows) = args.cows {
        config.number_of_cows = cows;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    if args.dump_scenario {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    info!(
        columns = config.columns,
        rows = config.rows,
        cows = config.number_of_cows,
        seed = ?config.seed,
        "starting barnsim"
    );

    let mut barn = Barn::new(config).context("building barn scene")?;

    let report = barn.herd_report();
    if report.spawned < report.requested {
        info!(
            spawned = report.spawned,
            requested = report.requested,
            "map too crowded, running with a smaller herd"
        );
    }

    for _ in 0..args.ticks {
        barn.step();
    }

    let [starting, translating, in_activity, idling] = barn.state_counts();
    info!(
        ticks = barn.tick(),
        starting,
        translating,
        in_activity,
        idling,
        replan_failures = barn.replan_failures(),
        "run complete"
    );

    Ok(())
}
