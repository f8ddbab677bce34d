//! UnitGroup - A homogeneous stack of individuals of one unit type

use super::constants::{CASUALTY_THRESHOLD, ELITE_DAMAGE_MULTIPLIER, HP_EPSILON, MIN_EFFICIENCY};
use super::stats::UnitStats;
use crate::error::BattleError;
use crate::types::{ArmorType, DamageKind};
use std::sync::Arc;

/// A stack of individuals sharing one [`UnitStats`] template
///
/// Invariant, enforced after every mutation:
/// `count == 0` implies `current_hp == 0`, and `current_hp <= 1e-5` forces
/// `count` to zero.
#[derive(Debug, Clone)]
pub struct UnitGroup {
    name: String,
    stats: Arc<UnitStats>,
    count: u32,
    current_hp: f64,
    terrain_bonus: f64,
    is_elite: bool,
    initial_count: u32,
    initial_hp: f64,
    round_hp_loss: f64,
    round_dead: u32,
}

impl UnitGroup {
    /// Create a group at full health
    pub fn new(name: impl Into<String>, stats: Arc<UnitStats>, count: u32) -> Self {
        let current_hp = count as f64 * stats.hp;
        UnitGroup {
            name: name.into(),
            stats,
            count,
            current_hp,
            terrain_bonus: 0.0,
            is_elite: false,
            initial_count: count,
            initial_hp: current_hp,
            round_hp_loss: 0.0,
            round_dead: 0,
        }
    }

    /// Set the starting hit points to an absolute value
    ///
    /// Rejects negative values and values above `count * hp`.
    pub fn with_current_hp(mut self, hp: f64) -> Result<Self, BattleError> {
        if !hp.is_finite() || hp < 0.0 {
            return Err(BattleError::InvalidGroupHp {
                name: self.name,
                hp,
            });
        }
        let capacity = self.max_hp();
        if hp > capacity + HP_EPSILON {
            return Err(BattleError::GroupHpExceedsCapacity {
                name: self.name,
                hp,
                capacity,
            });
        }
        // The configured count stays the starting figure even if the
        // invariant empties the group
        self.initial_count = self.count;
        self.current_hp = hp.min(capacity);
        self.enforce_invariant();
        self.initial_hp = self.current_hp;
        Ok(self)
    }

    /// Set the starting hit points as a fraction of capacity
    pub fn with_hp_ratio(self, ratio: f64) -> Result<Self, BattleError> {
        let hp = self.max_hp() * ratio;
        self.with_current_hp(hp)
    }

    /// Set the terrain bonus (applied as `1 + bonus`)
    pub fn with_terrain_bonus(mut self, bonus: f64) -> Result<Self, BattleError> {
        if !bonus.is_finite() || bonus < -1.0 {
            return Err(BattleError::InvalidTerrainBonus {
                name: self.name,
                bonus,
            });
        }
        self.terrain_bonus = bonus;
        Ok(self)
    }

    /// Mark the group as elite ("core")
    pub fn with_elite(mut self, is_elite: bool) -> Self {
        self.is_elite = is_elite;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> &UnitStats {
        &self.stats
    }

    pub fn armor_type(&self) -> ArmorType {
        self.stats.armor_type
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn current_hp(&self) -> f64 {
        self.current_hp
    }

    pub fn terrain_bonus(&self) -> f64 {
        self.terrain_bonus
    }

    pub fn is_elite(&self) -> bool {
        self.is_elite
    }

    pub fn initial_count(&self) -> u32 {
        self.initial_count
    }

    pub fn initial_hp(&self) -> f64 {
        self.initial_hp
    }

    /// Hit points lost since the last round reset
    pub fn round_hp_loss(&self) -> f64 {
        self.round_hp_loss
    }

    /// Individuals killed since the last round reset
    pub fn round_dead(&self) -> u32 {
        self.round_dead
    }

    /// Capacity of the surviving individuals
    pub fn max_hp(&self) -> f64 {
        self.count as f64 * self.stats.hp
    }

    /// Whether the group still contributes to its formation
    pub fn is_alive(&self) -> bool {
        self.count > 0 && self.current_hp > 0.0
    }

    /// Current hit points over surviving capacity; 0 for an empty group
    pub fn hp_ratio(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let capacity = self.max_hp();
        if capacity <= 0.0 {
            return 0.0;
        }
        self.current_hp / capacity
    }

    /// Combat efficiency from health: `0.2 + 0.8 * hp_ratio`
    pub fn efficiency(&self) -> f64 {
        MIN_EFFICIENCY + (1.0 - MIN_EFFICIENCY) * self.hp_ratio()
    }

    /// Damage one individual of this group deals against an armor classification
    ///
    /// `base * efficiency * (1 + terrain_bonus) * elite_multiplier`
    pub fn damage_output(&self, kind: DamageKind, target: ArmorType) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let base = self.stats.base_damage(kind, target);
        let terrain_mult = 1.0 + self.terrain_bonus;
        let elite_mult = if self.is_elite {
            ELITE_DAMAGE_MULTIPLIER
        } else {
            1.0
        };
        base * self.efficiency() * terrain_mult * elite_mult
    }

    /// Absorb incoming damage, converting it to casualties below the threshold
    ///
    /// The casualty check uses the hit-point ratio from before this call.
    pub fn absorb(&mut self, amount: f64) {
        if amount <= 0.0 || self.count == 0 {
            return;
        }

        let mut dead = 0;
        if self.hp_ratio() < CASUALTY_THRESHOLD {
            let avg_hp = self.current_hp / self.count as f64;
            if avg_hp > 0.0 {
                dead = ((amount / avg_hp).floor() as u64).min(self.count as u64) as u32;
            }
        }

        let real_damage = self.current_hp.min(amount);
        self.current_hp -= real_damage;
        self.round_hp_loss += real_damage;

        if dead > 0 {
            self.count -= dead;
            self.round_dead += dead;
        }

        self.enforce_invariant();

        tracing::trace!(
            group = %self.name,
            amount,
            real_damage,
            dead,
            remaining_hp = self.current_hp,
            remaining = self.count,
            "group absorbed damage"
        );
    }

    /// Clear this round's loss and kill counters
    pub fn reset_round_stats(&mut self) {
        self.round_hp_loss = 0.0;
        self.round_dead = 0;
    }

    fn enforce_invariant(&mut self) {
        if self.current_hp <= HP_EPSILON {
            self.current_hp = 0.0;
            self.count = 0;
        } else if self.count == 0 {
            self.current_hp = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArmorTable;

    fn infantry() -> Arc<UnitStats> {
        Arc::new(
            UnitStats::new(
                "infantry",
                10.0,
                ArmorType::Unarmored,
                ArmorTable::new().with(ArmorType::Unarmored, 2.0),
                ArmorTable::new().with(ArmorType::Unarmored, 1.0),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_full_health_output() {
        let group = UnitGroup::new("inf", infantry(), 100);
        assert!((group.hp_ratio() - 1.0).abs() < f64::EPSILON);
        assert!((group.efficiency() - 1.0).abs() < f64::EPSILON);
        assert!((group.damage_output(DamageKind::Attack, ArmorType::Unarmored) - 2.0).abs() < 1e-12);
        assert_eq!(group.damage_output(DamageKind::Attack, ArmorType::Air), 0.0);
    }

    #[test]
    fn test_output_layers_multiply() {
        let group = UnitGroup::new("inf", infantry(), 10)
            .with_hp_ratio(0.5)
            .unwrap()
            .with_terrain_bonus(0.25)
            .unwrap()
            .with_elite(true);

        // 2.0 * (0.2 + 0.8 * 0.5) * 1.25 * 1.15
        let expected = 2.0 * 0.6 * 1.25 * 1.15;
        assert!((group.damage_output(DamageKind::Attack, ArmorType::Unarmored) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_absorb_above_threshold_no_casualties() {
        let mut group = UnitGroup::new("inf", infantry(), 100);
        group.absorb(600.0);

        // Ratio drops to 0.4 mid-call but the pre-absorption ratio gates casualties
        assert!((group.current_hp() - 400.0).abs() < 1e-9);
        assert_eq!(group.count(), 100);
        assert_eq!(group.round_dead(), 0);
        assert!((group.round_hp_loss() - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_absorb_below_threshold_kills() {
        let mut group = UnitGroup::new("inf", infantry(), 100)
            .with_current_hp(400.0)
            .unwrap();
        group.absorb(50.0);

        // avg hp = 4, floor(50 / 4) = 12
        assert_eq!(group.count(), 88);
        assert_eq!(group.round_dead(), 12);
        assert!((group.current_hp() - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_absorb_overkill_zeroes_group() {
        let mut group = UnitGroup::new("inf", infantry(), 5);
        group.absorb(1000.0);

        assert_eq!(group.count(), 0);
        assert_eq!(group.current_hp(), 0.0);
        assert!(!group.is_alive());
        assert!((group.round_hp_loss() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_absorb_ignores_non_positive() {
        let mut group = UnitGroup::new("inf", infantry(), 5);
        group.absorb(0.0);
        group.absorb(-10.0);
        assert!((group.current_hp() - 50.0).abs() < f64::EPSILON);
        assert_eq!(group.round_hp_loss(), 0.0);
    }

    #[test]
    fn test_kills_capped_at_count() {
        let mut group = UnitGroup::new("inf", infantry(), 10)
            .with_current_hp(20.0)
            .unwrap();
        group.absorb(15.0);

        // floor(15 / 2) = 7 dead, 5 hp left
        assert_eq!(group.count(), 3);
        assert!((group.current_hp() - 5.0).abs() < 1e-9);

        group.absorb(4.9);
        // ratio 5/30 < 0.5, avg 5/3, floor(4.9 / 1.667) = 2
        assert_eq!(group.count(), 1);
    }

    #[test]
    fn test_reset_round_stats() {
        let mut group = UnitGroup::new("inf", infantry(), 10)
            .with_current_hp(40.0)
            .unwrap();
        group.absorb(10.0);
        assert!(group.round_dead() > 0);

        group.reset_round_stats();
        assert_eq!(group.round_dead(), 0);
        assert_eq!(group.round_hp_loss(), 0.0);
    }

    #[test]
    fn test_rejects_invalid_hp() {
        assert!(UnitGroup::new("inf", infantry(), 10).with_current_hp(-1.0).is_err());
        assert!(matches!(
            UnitGroup::new("inf", infantry(), 10).with_current_hp(101.0),
            Err(BattleError::GroupHpExceedsCapacity { .. })
        ));
        assert!(UnitGroup::new("inf", infantry(), 10).with_terrain_bonus(-1.5).is_err());
    }

    #[test]
    fn test_zero_hp_start_is_dead() {
        let group = UnitGroup::new("inf", infantry(), 10).with_hp_ratio(0.0).unwrap();
        assert_eq!(group.count(), 0);
        assert_eq!(group.initial_count(), 10);
        assert_eq!(group.initial_hp(), 0.0);
        assert!(!group.is_alive());
        assert_eq!(group.hp_ratio(), 0.0);
    }
}
