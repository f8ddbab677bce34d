//! Defense system - Fortifications and formation-level mitigation

mod fortification;
mod mitigation;

pub use fortification::{Fortification, FortificationLevel};
pub use mitigation::{apply_mitigation, total_mitigation};

/// Defense calculation constants
pub mod constants {
    /// Flat mitigation granted to an elite ("core") formation
    pub const ELITE_MITIGATION_BONUS: f64 = 0.15;

    /// Upper bound of combined mitigation (100% reduction)
    pub const MAX_MITIGATION: f64 = 1.0;

    /// Fraction of a partially intact level's mitigation that is kept even at zero hit points
    pub const PARTIAL_LEVEL_FLOOR: f64 = 0.2;

    /// Tolerance when comparing hit points against the first level's capacity
    pub const LEVEL_EPSILON: f64 = 1e-9;
}
