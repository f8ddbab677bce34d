//! battle_core - Round-based battle resolution between two forces
//!
//! This library provides:
//! - UnitStats / UnitGroup: Unit templates and stacks with casualty modeling
//! - Fortification: Leveled structures whose mitigation decays with damage
//! - Formation / Force: Aggregation, engagement-capped output and damage distribution
//! - Battle: The round loop for direct assault, field engagement and air raid
//! - Snapshots: Read-only per-round and final state for reporting
//! - Config: Building forces from TOML or JSON scenario files

pub mod combat;
pub mod config;
pub mod defense;
pub mod error;
pub mod force;
pub mod prelude;
pub mod types;
pub mod unit;

// Re-export core types for convenience
pub use combat::{
    Battle, BattleOutcome, BattleReport, BattleSettings, ForceSnapshot, FormationSnapshot,
    FortificationSnapshot, GroupSnapshot, RoundReport,
};
pub use config::{load_scenario_dir, ConfigError, Scenario};
pub use defense::{Fortification, FortificationLevel};
pub use error::BattleError;
pub use force::{Force, ForceOutput, Formation};
pub use types::{ArmorTable, ArmorType, BattleMode, DamageKind};
pub use unit::{UnitGroup, UnitStats};
