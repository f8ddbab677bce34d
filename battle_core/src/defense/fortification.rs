//! Fortification - Leveled structure whose mitigation decays with damage
//!
//! Each level adds hit-point capacity and mitigation. Current hit points are
//! spent level by level, lowest first:
//! - A level whose capacity fits in the remaining hit points grants its full mitigation
//! - The first level that does not fit grants `(0.2 + 0.8 * ratio) * mitigation`
//! - Level 1 grants nothing partial: below its capacity, mitigation is zero
//!
//! Example, levels `[(1, 500, 10%), (2, 300, 10%)]`:
//! - 800 hp: 10% + 10% = 20%
//! - 650 hp: 10% + (0.2 + 0.8 * 150/300) * 10% = 16%
//! - 400 hp: 0%

use super::constants::{LEVEL_EPSILON, PARTIAL_LEVEL_FLOOR};
use crate::error::BattleError;
use serde::{Deserialize, Serialize};

/// One level of a fortification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FortificationLevel {
    /// Level index (1-based)
    pub level: u32,
    /// Hit-point capacity added by this level
    #[serde(alias = "hp_add")]
    pub hp: f64,
    /// Mitigation added by this level (as decimal)
    #[serde(alias = "mitigation_add")]
    pub mitigation: f64,
}

impl FortificationLevel {
    pub fn new(level: u32, hp: f64, mitigation: f64) -> Self {
        FortificationLevel {
            level,
            hp,
            mitigation,
        }
    }
}

/// A fortified structure owned by a formation
#[derive(Debug, Clone, PartialEq)]
pub struct Fortification {
    name: String,
    levels: Vec<FortificationLevel>,
    current_hp: f64,
    initial_hp: f64,
}

impl Fortification {
    /// Create a fortification at full hit points
    ///
    /// Levels are sorted by level index. Negative capacities or mitigations
    /// are rejected.
    pub fn new(
        name: impl Into<String>,
        mut levels: Vec<FortificationLevel>,
    ) -> Result<Self, BattleError> {
        let name = name.into();
        if let Some(bad) = levels.iter().find(|l| {
            !l.hp.is_finite() || l.hp < 0.0 || !l.mitigation.is_finite() || l.mitigation < 0.0
        }) {
            return Err(BattleError::InvalidFortificationLevel {
                name,
                level: bad.level,
            });
        }
        levels.sort_by_key(|l| l.level);

        let max_hp = levels.iter().map(|l| l.hp).sum();
        Ok(Fortification {
            name,
            levels,
            current_hp: max_hp,
            initial_hp: max_hp,
        })
    }

    /// Set the starting hit points to an absolute value in `[0, max_hp]`
    pub fn with_current_hp(mut self, hp: f64) -> Result<Self, BattleError> {
        let max_hp = self.max_hp();
        if !hp.is_finite() || hp < 0.0 || hp > max_hp + LEVEL_EPSILON {
            return Err(BattleError::InvalidFortificationHp {
                name: self.name,
                hp,
                max_hp,
            });
        }
        self.current_hp = hp.min(max_hp);
        self.initial_hp = self.current_hp;
        Ok(self)
    }

    /// Set the starting hit points as a fraction of the maximum
    pub fn with_hp_ratio(self, ratio: f64) -> Result<Self, BattleError> {
        let hp = self.max_hp() * ratio;
        self.with_current_hp(hp)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn levels(&self) -> &[FortificationLevel] {
        &self.levels
    }

    pub fn current_hp(&self) -> f64 {
        self.current_hp
    }

    pub fn initial_hp(&self) -> f64 {
        self.initial_hp
    }

    /// Sum of all level capacities
    pub fn max_hp(&self) -> f64 {
        self.levels.iter().map(|l| l.hp).sum()
    }

    /// Current mitigation fraction
    pub fn current_mitigation(&self) -> f64 {
        let Some(first) = self.levels.first() else {
            return 0.0;
        };
        if self.current_hp < first.hp - LEVEL_EPSILON {
            return 0.0;
        }

        let mut total = 0.0;
        let mut budget = self.current_hp;
        for level in &self.levels {
            if budget >= level.hp {
                total += level.mitigation;
                budget -= level.hp;
            } else {
                if level.level > 1 {
                    let ratio = budget / level.hp;
                    total += (PARTIAL_LEVEL_FLOOR + (1.0 - PARTIAL_LEVEL_FLOOR) * ratio)
                        * level.mitigation;
                }
                break;
            }
        }
        total
    }

    /// Apply siege damage directly; hit points never go below zero
    pub fn take_damage(&mut self, damage: f64) {
        if damage <= 0.0 {
            return;
        }
        self.current_hp = (self.current_hp - damage).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level() -> Fortification {
        Fortification::new(
            "fort",
            vec![
                FortificationLevel::new(1, 500.0, 0.10),
                FortificationLevel::new(2, 300.0, 0.10),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_full_hp_mitigation() {
        let fort = two_level();
        assert!((fort.max_hp() - 800.0).abs() < f64::EPSILON);
        assert!((fort.current_mitigation() - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_partial_level_interpolates() {
        let fort = two_level().with_current_hp(650.0).unwrap();
        // 0.10 + (0.2 + 0.8 * 0.5) * 0.10
        assert!((fort.current_mitigation() - 0.16).abs() < 1e-12);
    }

    #[test]
    fn test_below_first_level_is_zero() {
        let fort = two_level().with_current_hp(400.0).unwrap();
        assert_eq!(fort.current_mitigation(), 0.0);
    }

    #[test]
    fn test_exactly_first_level_keeps_floor_of_next() {
        let fort = two_level().with_current_hp(500.0).unwrap();
        // Level 2 has zero budget left but still grants its 20% floor
        assert!((fort.current_mitigation() - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_levels_sorted_on_construction() {
        let fort = Fortification::new(
            "fort",
            vec![
                FortificationLevel::new(2, 300.0, 0.10),
                FortificationLevel::new(1, 500.0, 0.10),
            ],
        )
        .unwrap();
        assert_eq!(fort.levels()[0].level, 1);
    }

    #[test]
    fn test_no_levels() {
        let fort = Fortification::new("ruin", Vec::new()).unwrap();
        assert_eq!(fort.max_hp(), 0.0);
        assert_eq!(fort.current_mitigation(), 0.0);
    }

    #[test]
    fn test_take_damage_floors_at_zero() {
        let mut fort = two_level();
        fort.take_damage(300.0);
        assert!((fort.current_hp() - 500.0).abs() < f64::EPSILON);
        fort.take_damage(10_000.0);
        assert_eq!(fort.current_hp(), 0.0);
        assert_eq!(fort.current_mitigation(), 0.0);
        assert!((fort.initial_hp() - 800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        assert!(Fortification::new("bad", vec![FortificationLevel::new(1, -5.0, 0.1)]).is_err());
        assert!(two_level().with_current_hp(900.0).is_err());
        assert!(two_level().with_current_hp(-1.0).is_err());
    }
}
