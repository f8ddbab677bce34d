//! Construction errors for battle entities

use thiserror::Error;

/// Rejected entity construction
///
/// The core assumes a well-typed entity graph; anything that would break a
/// hit-point or count invariant is refused here rather than clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    #[error("unit type '{name}' must have positive hit points, got {hp}")]
    InvalidUnitHp { name: String, hp: f64 },
    #[error("group '{name}' has invalid hit points {hp}")]
    InvalidGroupHp { name: String, hp: f64 },
    #[error("group '{name}' hit points {hp} exceed capacity {capacity}")]
    GroupHpExceedsCapacity { name: String, hp: f64, capacity: f64 },
    #[error("group '{name}' terrain bonus {bonus} is below -1")]
    InvalidTerrainBonus { name: String, bonus: f64 },
    #[error("fortification '{name}' level {level} has invalid capacity or mitigation")]
    InvalidFortificationLevel { name: String, level: u32 },
    #[error("fortification '{name}' hit points {hp} outside [0, {max_hp}]")]
    InvalidFortificationHp { name: String, hp: f64, max_hp: f64 },
}
