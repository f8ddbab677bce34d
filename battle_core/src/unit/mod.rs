//! Unit types and unit groups

mod group;
mod stats;

pub use group::UnitGroup;
pub use stats::UnitStats;

/// Unit-level combat constants
pub mod constants {
    /// Hit-point ratio below which absorbed damage starts killing individuals
    pub const CASUALTY_THRESHOLD: f64 = 0.50;

    /// Efficiency floor of a group at zero health
    pub const MIN_EFFICIENCY: f64 = 0.2;

    /// Output multiplier for elite ("core") groups
    pub const ELITE_DAMAGE_MULTIPLIER: f64 = 1.15;

    /// Hit points at or below this are treated as a destroyed group
    pub const HP_EPSILON: f64 = 1e-5;
}
