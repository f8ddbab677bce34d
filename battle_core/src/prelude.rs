//! Prelude module for convenient imports
//!
//! ```rust
//! use battle_core::prelude::*;
//! ```

// Core types
pub use crate::types::{ArmorTable, ArmorType, BattleMode, DamageKind};
pub use crate::unit::{UnitGroup, UnitStats};
pub use crate::defense::{Fortification, FortificationLevel};
pub use crate::force::{Force, ForceOutput, Formation};

// Combat
pub use crate::combat::{Battle, BattleOutcome, BattleReport, BattleSettings, RoundReport};

// Config
pub use crate::config::{load_scenario_dir, Scenario};

// Errors
pub use crate::config::ConfigError;
pub use crate::error::BattleError;
