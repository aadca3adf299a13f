//! Engine binary for the Equilibria fixed-point games.
//!
//! Loads configuration, builds the requested absent-minded driver games,
//! runs each one to its step budget, and prints a JSON snapshot of every
//! final environment on stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration from `equilibria-config.yaml` (defaults if absent)
//! 3. Initialize structured logging (tracing)
//! 4. Build and run each scenario
//! 5. Print the snapshots

mod config;
mod error;
mod scenarios;

use std::path::{Path, PathBuf};

use clap::Parser;
use equilibria_agents::TrajectoryRecorder;
use equilibria_core::Environment;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{EngineConfig, LoggingConfig};
use crate::error::EngineError;
use crate::scenarios::Scenario;

/// Variables whose trajectories are tracked during a run.
const TRACKED_KEYS: [&str; 3] = ["n", "p", "PC"];

/// Iterate absent-minded driver games to their fixed points.
#[derive(Debug, Parser)]
#[command(name = "equilibria-engine", version, about)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "equilibria-config.yaml")]
    config: PathBuf,

    /// Scenario to run. Runs every scenario when omitted.
    #[arg(long, value_enum)]
    scenario: Option<Scenario>,

    /// Steps to run before finalizing. Overrides `game.default_run_steps`.
    #[arg(long)]
    steps: Option<u64>,
}

/// Final state of one game, as printed on stdout.
#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    game: &'a str,
    steps: u64,
    environment: &'a Environment,
}

fn main() -> Result<(), EngineError> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    init_logging(&config.logging);
    if !args.config.exists() {
        info!(config = %args.config.display(), "Config file not found, using defaults");
    }

    info!(
        config = %args.config.display(),
        independent_update = config.game.independent_update,
        default_run_steps = config.game.default_run_steps,
        debug_period = config.debug.period,
        "equilibria-engine starting"
    );

    let scenarios = args
        .scenario
        .map_or_else(|| Scenario::ALL.to_vec(), |scenario| vec![scenario]);

    for scenario in scenarios {
        run_scenario(scenario, &config, args.steps)?;
    }

    info!("equilibria-engine finished");
    Ok(())
}

/// Build, run, and report a single scenario.
fn run_scenario(
    scenario: Scenario,
    config: &EngineConfig,
    steps: Option<u64>,
) -> Result<(), EngineError> {
    let mut game = scenarios::build(scenario, config)?;
    let mut recorder = TrajectoryRecorder::new(TRACKED_KEYS);

    game.run_observed(steps, &mut recorder)?;
    let snapshot = Snapshot {
        game: game.name(),
        steps: game.step_count(),
        environment: game.environment(),
    };
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    for key in TRACKED_KEYS {
        match recorder.last_change(key) {
            Some(change) => info!(game = game.name(), key, change, "Last change"),
            None => warn!(game = game.name(), key, "Not enough samples to measure change"),
        }
    }
    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the
/// file does not exist.
fn load_config(path: &Path) -> Result<EngineConfig, EngineError> {
    if path.exists() {
        Ok(EngineConfig::from_file(path)?)
    } else {
        let mut config = EngineConfig::default();
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
