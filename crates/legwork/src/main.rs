use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use legwork::{AppConfig, Scenario, Simulation};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of ticks to simulate (overrides config)
    #[arg(long)]
    ticks: Option<usize>,

    /// RNG seed (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Scenario preset (flat, corridor, pit, cage) or path to a .ron file
    #[arg(long)]
    scenario: Option<String>,

    /// Number of legs of the generated creature (overrides config)
    #[arg(long)]
    legs: Option<usize>,

    /// Config file to load instead of ./legwork.ron
    #[arg(long)]
    config: Option<PathBuf>,

    /// List available scenario presets
    #[arg(long)]
    list_scenarios: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    // Handle --list-scenarios flag
    if args.list_scenarios {
        legwork::scenario::list_presets();
        return Ok(());
    }

    let mut config = AppConfig::load(args.config.as_deref())?;

    // Command-line flags take priority over every config layer
    if let Some(ticks) = args.ticks {
        config.run.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(scenario) = args.scenario {
        config.run.scenario = scenario;
    }
    if let Some(legs) = args.legs {
        config.run.leg_count = legs;
    }

    let scenario = Scenario::resolve(&config.run.scenario)?;
    let mut simulation =
        Simulation::new(&scenario, &config).context("Failed to set up simulation")?;

    log::info!(
        "Running '{}' for {} ticks ({:.3}s per tick)",
        scenario.name,
        config.run.ticks,
        config.run.delta_time
    );
    let report = simulation.run(config.run.ticks)?;
    report.log();

    Ok(())
}
