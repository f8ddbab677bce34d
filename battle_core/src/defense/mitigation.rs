//! Mitigation - Combined damage reduction of a formation

use super::constants::{ELITE_MITIGATION_BONUS, MAX_MITIGATION};
use super::fortification::Fortification;

/// Combined mitigation of an optional fortification plus the elite bonus
///
/// Result is clamped to `[0, 1]`.
pub fn total_mitigation(fortification: Option<&Fortification>, is_elite: bool) -> f64 {
    let mut mitigation = fortification.map_or(0.0, Fortification::current_mitigation);
    if is_elite {
        mitigation += ELITE_MITIGATION_BONUS;
    }
    mitigation.clamp(0.0, MAX_MITIGATION)
}

/// Apply a mitigation fraction to raw damage
pub fn apply_mitigation(raw: f64, mitigation: f64) -> f64 {
    raw * (1.0 - mitigation)
}
