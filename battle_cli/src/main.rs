//! battle - Resolve a battle scenario and print the round-by-round report

mod report;

use battle_core::config::{self, BattleConfig, BuildingCatalog, UnitCatalog};
use battle_core::prelude::*;
use clap::Parser;
use report::TextReport;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_SCENARIO_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/scenario");

/// Round-based battle resolver
#[derive(Parser, Debug)]
#[command(name = "battle")]
#[command(about = "Resolve a battle between two forces from scenario files")]
struct Args {
    /// Scenario directory holding units, buildings and battle files
    scenario: Option<PathBuf>,

    /// Unit catalog file (requires --battle)
    #[arg(long)]
    units: Option<PathBuf>,

    /// Building catalog file
    #[arg(long)]
    buildings: Option<PathBuf>,

    /// Battle description file (requires --units)
    #[arg(long)]
    battle: Option<PathBuf>,

    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Disable random damage factors
    #[arg(long)]
    no_random: bool,

    /// Round cap
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Battle mode: LAND_ATTACK, LAND_MEET or AIR_STRIKE
    #[arg(long)]
    mode: Option<BattleMode>,

    /// List every group each round, not only those with losses
    #[arg(long, short = 'd')]
    detailed: bool,

    /// Print the battle report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut scenario = load_scenario(args)?;
    apply_overrides(&mut scenario.battle, args);

    let mut battle = scenario.build_battle()?;
    let report = match scenario.battle.seed {
        Some(seed) => battle.run_seeded(seed),
        None => battle.run(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            TextReport {
                report: &report,
                randomness: scenario.battle.enable_randomness,
                detailed: scenario.battle.detailed_output,
            }
        );
    }
    Ok(())
}

fn load_scenario(args: &Args) -> Result<Scenario, ConfigError> {
    match (&args.units, &args.battle) {
        (None, None) => {
            let dir = args
                .scenario
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIO_DIR));
            tracing::info!(dir = %dir.display(), "loading scenario directory");
            load_scenario_dir(&dir)
        }
        (Some(units), Some(battle)) => {
            let units = UnitCatalog::load(units)?;
            let buildings = match &args.buildings {
                Some(path) => BuildingCatalog::load(path)?,
                None => BuildingCatalog::default(),
            };
            let battle: BattleConfig = config::load_file(battle)?;
            Ok(Scenario::new(units, buildings, battle))
        }
        _ => Err(ConfigError::ValidationError(
            "--units and --battle must be given together".to_string(),
        )),
    }
}

/// Command-line flags take precedence over the battle file
fn apply_overrides(config: &mut BattleConfig, args: &Args) {
    if let Some(mode) = args.mode {
        config.battle_mode = mode;
    }
    if let Some(max_rounds) = args.max_rounds {
        config.max_rounds = max_rounds;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_random {
        config.enable_randomness = false;
    }
    if args.detailed {
        config.detailed_output = true;
    }
}
