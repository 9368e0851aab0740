//! traveller: star-traveller planning engine.
//!
//! `traveller play` speaks the game protocol on stdin/stdout.
//! `traveller simulate` plays a generated scenario offline and prints a
//! report, optionally with a per-turn CSV trace.

mod logging;
mod protocol;

#[cfg(test)]
mod tests;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use st_core::{EngineConfig, Strategy};
use st_sim::{CsvTraceWriter, NoopObserver, Scenario, ScenarioConfig, Sim};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "traveller")]
#[command(about = "Plan star-traveller fleets: hitchhike on UFOs, then sweep the rest")]
struct Cli {
    /// Engine configuration as JSON; missing fields take their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the RNG seed.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override the total planning budget in milliseconds.
    #[arg(long, global = true)]
    planning_ms: Option<u64>,

    /// Override the construction strategy (nn, fi, kmeans).
    #[arg(long, global = true)]
    strategy: Option<Strategy>,

    /// Log filter directive, e.g. `debug` or `st_tour=debug`.  Defaults to
    /// `RUST_LOG`, then `info`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play one game over stdin/stdout.
    Play,

    /// Play a generated scenario offline.
    Simulate {
        /// Scenario configuration as JSON; missing fields take their defaults.
        #[arg(long)]
        scenario: Option<PathBuf>,

        #[arg(long)]
        stars: Option<usize>,

        #[arg(long)]
        ships: Option<usize>,

        #[arg(long)]
        ufos: Option<usize>,

        /// Seats per UFO.
        #[arg(long)]
        capacity: Option<u32>,

        /// Write a per-turn CSV trace here.
        #[arg(long)]
        trace: Option<PathBuf>,
    },
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn load_json<T: serde::de::DeserializeOwned + Default>(path: Option<&PathBuf>) -> Result<T> {
    let Some(path) = path else { return Ok(T::default()) };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))
}

fn engine_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config: EngineConfig = load_json(cli.config.as_ref())?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(ms) = cli.planning_ms {
        config.planning_budget_ms = ms;
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    config.validate()?;
    Ok(config)
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn simulate(
    config: EngineConfig,
    mut scenario_config: ScenarioConfig,
    seed: Option<u64>,
    trace: Option<PathBuf>,
) -> Result<()> {
    if let Some(seed) = seed {
        scenario_config.seed = seed;
    }
    let scenario = Scenario::generate(scenario_config)?;
    tracing::info!(
        stars = scenario.stars.len(),
        ships = scenario.ships.len(),
        ufos = scenario.ufos.len(),
        "scenario generated"
    );

    let mut sim = Sim::new(scenario, config)?;
    let start = Instant::now();
    let report = match trace {
        Some(path) => {
            let mut writer = CsvTraceWriter::create(&path)?;
            let report = sim.run(&mut writer)?;
            if let Some(e) = writer.take_error() {
                return Err(e).with_context(|| format!("writing {}", path.display()));
            }
            tracing::info!(path = %path.display(), rows = writer.rows(), "trace written");
            report
        }
        None => sim.run(&mut NoopObserver)?,
    };

    println!("{report}");
    println!("wall time:    {:.2?}", start.elapsed());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref())?;
    let config = engine_config(&cli)?;

    match cli.command {
        Command::Play => {
            let stdin = io::stdin().lock();
            let stdout = io::stdout().lock();
            protocol::play(config, stdin, stdout)?;
        }
        Command::Simulate { ref scenario, stars, ships, ufos, capacity, ref trace } => {
            let mut scenario_config: ScenarioConfig = load_json(scenario.as_ref())?;
            if let Some(n) = stars {
                scenario_config.star_count = n;
            }
            if let Some(n) = ships {
                scenario_config.ship_count = n;
            }
            if let Some(n) = ufos {
                scenario_config.ufo_count = n;
            }
            if let Some(c) = capacity {
                scenario_config.ufo_capacity = c;
            }
            simulate(config, scenario_config, cli.seed, trace.clone())?;
        }
    }
    Ok(())
}
