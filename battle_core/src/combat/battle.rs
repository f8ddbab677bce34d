//! Battle orchestration - The round loop
//!
//! Each round:
//! 1. Clear both forces' per-round loss and kill counters
//! 2. Draw the round's attack and defense factors
//! 3. Run the mode's turn order
//! 4. Capture a [`RoundReport`]
//!
//! The loop ends as soon as either force is defeated, or after
//! `max_rounds` rounds regardless of how much damage is being dealt.

use super::clash::{resolve_air_sortie, resolve_clash};
use super::factor::roll_factor;
use super::report::{BattleOutcome, BattleReport, ForceSnapshot, RoundReport};
use crate::force::Force;
use crate::types::{BattleMode, DamageKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Default round cap
pub const DEFAULT_MAX_ROUNDS: u32 = 50;

/// Run-time settings of one battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSettings {
    pub mode: BattleMode,
    /// Hard bound on the number of rounds
    pub max_rounds: u32,
    /// Whether damage factors are drawn from the RNG (otherwise fixed at 1.0)
    pub randomness: bool,
}

impl Default for BattleSettings {
    fn default() -> Self {
        BattleSettings {
            mode: BattleMode::DirectAssault,
            max_rounds: DEFAULT_MAX_ROUNDS,
            randomness: true,
        }
    }
}

/// Which force a formation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// A battle between two forces
///
/// Force A is the attacker in direct assaults and air raids.
#[derive(Debug, Clone)]
pub struct Battle {
    force_a: Force,
    force_b: Force,
    settings: BattleSettings,
    round: u32,
}

impl Battle {
    pub fn new(force_a: Force, force_b: Force, settings: BattleSettings) -> Self {
        Battle {
            force_a,
            force_b,
            settings,
            round: 0,
        }
    }

    pub fn force_a(&self) -> &Force {
        &self.force_a
    }

    pub fn force_b(&self) -> &Force {
        &self.force_b
    }

    pub fn settings(&self) -> &BattleSettings {
        &self.settings
    }

    /// Number of rounds fought so far
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Whether the round cap is reached or either force is defeated
    pub fn is_over(&self) -> bool {
        self.round >= self.settings.max_rounds
            || !self.force_a.is_alive()
            || !self.force_b.is_alive()
    }

    pub fn outcome(&self) -> BattleOutcome {
        BattleOutcome::from_survivors(self.force_a.is_alive(), self.force_b.is_alive())
    }

    /// Play one round; `None` once the battle is over
    pub fn step(&mut self, rng: &mut impl Rng) -> Option<RoundReport> {
        if self.is_over() {
            return None;
        }
        self.round += 1;

        self.force_a.reset_round_stats();
        self.force_b.reset_round_stats();

        let attack_factor = roll_factor(rng, self.settings.randomness);
        let defense_factor = roll_factor(rng, self.settings.randomness);

        match self.settings.mode {
            BattleMode::DirectAssault => self.direct_assault(attack_factor, defense_factor),
            BattleMode::FieldEngagement => self.field_engagement(attack_factor, defense_factor),
            BattleMode::AirRaid => self.air_raid(rng, attack_factor),
        }

        let report = RoundReport {
            round: self.round,
            attack_factor,
            defense_factor,
            force_a: ForceSnapshot::capture(&self.force_a),
            force_b: ForceSnapshot::capture(&self.force_b),
        };

        tracing::debug!(
            round = self.round,
            attack_factor,
            defense_factor,
            force_a_hp = report.force_a.total_hp,
            force_a_count = report.force_a.total_count,
            force_b_hp = report.force_b.total_hp,
            force_b_count = report.force_b.total_count,
            "round complete"
        );

        Some(report)
    }

    /// Run to completion with a thread-local RNG
    pub fn run(&mut self) -> BattleReport {
        let mut rng = rand::thread_rng();
        self.run_with_rng(&mut rng)
    }

    /// Run to completion with a fixed seed (exactly reproducible)
    pub fn run_seeded(&mut self, seed: u64) -> BattleReport {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.run_with_rng(&mut rng)
    }

    /// Run to completion with a provided RNG
    pub fn run_with_rng(&mut self, rng: &mut impl Rng) -> BattleReport {
        tracing::info!(
            force_a = self.force_a.name(),
            force_b = self.force_b.name(),
            mode = %self.settings.mode,
            max_rounds = self.settings.max_rounds,
            randomness = self.settings.randomness,
            "battle started"
        );

        let mut rounds = Vec::new();
        while let Some(report) = self.step(rng) {
            rounds.push(report);
        }

        let outcome = self.outcome();
        tracing::info!(rounds = self.round, ?outcome, "battle finished");

        BattleReport {
            mode: self.settings.mode,
            rounds_fought: self.round,
            outcome,
            rounds,
            force_a: ForceSnapshot::capture(&self.force_a),
            force_b: ForceSnapshot::capture(&self.force_b),
        }
    }

    /// Consume the battle, returning both forces
    pub fn into_forces(self) -> (Force, Force) {
        (self.force_a, self.force_b)
    }

    fn direct_assault(&mut self, attack_factor: f64, defense_factor: f64) {
        for index in 0..self.force_a.formations().len() {
            if !self.force_b.is_alive() {
                break;
            }
            if let Some(formation) = self.force_a.formation_mut(index) {
                resolve_clash(formation, &mut self.force_b, attack_factor, defense_factor);
            }
        }
    }

    fn field_engagement(&mut self, attack_factor: f64, defense_factor: f64) {
        for (side, index) in interleaved_order(&self.force_a, &self.force_b) {
            let (active_force, target_force) = match side {
                Side::A => (&mut self.force_a, &mut self.force_b),
                Side::B => (&mut self.force_b, &mut self.force_a),
            };
            if let Some(formation) = active_force.formation_mut(index) {
                resolve_clash(formation, target_force, attack_factor, defense_factor);
            }
        }
    }

    fn air_raid(&mut self, rng: &mut impl Rng, attack_factor: f64) {
        for index in 0..self.force_a.formations().len() {
            let formation_alive = self.force_a.formations()[index].is_alive();
            if !formation_alive || !self.force_b.is_alive() {
                continue;
            }

            let suppression_factor = roll_factor(rng, self.settings.randomness);
            let suppression =
                self.force_b
                    .compute_output(&self.force_a, DamageKind::Defense, suppression_factor);

            if let Some(formation) = self.force_a.formation_mut(index) {
                resolve_air_sortie(formation, &suppression, &mut self.force_b, attack_factor);
            }
        }
    }
}

/// Field engagement turn order: `A0, B0, A1, B1, ...` with the longer tail appended
fn interleaved_order(force_a: &Force, force_b: &Force) -> Vec<(Side, usize)> {
    let len_a = force_a.formations().len();
    let len_b = force_b.formations().len();
    let mut order = Vec::with_capacity(len_a + len_b);
    for index in 0..len_a.max(len_b) {
        if index < len_a {
            order.push((Side::A, index));
        }
        if index < len_b {
            order.push((Side::B, index));
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force::Formation;
    use crate::types::{ArmorTable, ArmorType};
    use crate::unit::{UnitGroup, UnitStats};
    use std::sync::Arc;

    fn infantry(attack: f64, defense: f64) -> Arc<UnitStats> {
        Arc::new(
            UnitStats::new(
                "infantry",
                10.0,
                ArmorType::Unarmored,
                ArmorTable::new().with(ArmorType::Unarmored, attack),
                ArmorTable::new().with(ArmorType::Unarmored, defense),
            )
            .unwrap(),
        )
    }

    fn force(name: &str, formations: usize, count: u32, attack: f64, defense: f64) -> Force {
        Force::new(
            name,
            (0..formations)
                .map(|i| {
                    Formation::new(
                        format!("{}-{}", name, i),
                        vec![UnitGroup::new("inf", infantry(attack, defense), count)],
                    )
                })
                .collect(),
        )
    }

    fn settings(mode: BattleMode, max_rounds: u32) -> BattleSettings {
        BattleSettings {
            mode,
            max_rounds,
            randomness: false,
        }
    }

    #[test]
    fn test_interleaved_order_ragged_tail() {
        let a = force("a", 3, 1, 0.0, 0.0);
        let b = force("b", 1, 1, 0.0, 0.0);
        let order = interleaved_order(&a, &b);
        assert_eq!(
            order,
            vec![(Side::A, 0), (Side::B, 0), (Side::A, 1), (Side::A, 2)]
        );
    }

    #[test]
    fn test_zero_damage_runs_to_round_cap() {
        let mut battle = Battle::new(
            force("a", 1, 10, 0.0, 0.0),
            force("b", 1, 10, 0.0, 0.0),
            settings(BattleMode::DirectAssault, 7),
        );
        let report = battle.run_seeded(1);

        assert_eq!(report.rounds_fought, 7);
        assert_eq!(report.rounds.len(), 7);
        assert_eq!(report.outcome, BattleOutcome::RoundLimit);
        assert_eq!(report.force_a.total_count, 10);
        assert_eq!(report.force_b.total_count, 10);
    }

    #[test]
    fn test_zero_max_rounds() {
        let mut battle = Battle::new(
            force("a", 1, 10, 1.0, 1.0),
            force("b", 1, 10, 1.0, 1.0),
            settings(BattleMode::FieldEngagement, 0),
        );
        let report = battle.run_seeded(1);
        assert_eq!(report.rounds_fought, 0);
        assert!(report.rounds.is_empty());
    }

    #[test]
    fn test_direct_assault_ends_on_defeat() {
        let mut battle = Battle::new(
            force("a", 2, 50, 100.0, 0.0),
            force("b", 1, 5, 0.0, 0.0),
            settings(BattleMode::DirectAssault, 50),
        );
        let report = battle.run_seeded(3);

        assert_eq!(report.outcome, BattleOutcome::AttackerVictory);
        assert_eq!(report.rounds_fought, 1);
        assert!(battle.is_over());
        assert!(battle.step(&mut ChaCha8Rng::seed_from_u64(0)).is_none());
    }

    #[test]
    fn test_only_force_a_attacks_in_direct_assault() {
        // B has attack but no defense; in a direct assault it never strikes back
        let mut battle = Battle::new(
            force("a", 1, 10, 1.0, 0.0),
            force("b", 1, 10, 50.0, 0.0),
            settings(BattleMode::DirectAssault, 3),
        );
        let report = battle.run_seeded(5);
        assert!((report.force_a.total_hp - 100.0).abs() < f64::EPSILON);
        assert!(report.force_b.total_hp < 100.0);
    }

    #[test]
    fn test_field_engagement_both_sides_attack() {
        let mut battle = Battle::new(
            force("a", 1, 10, 1.0, 0.0),
            force("b", 1, 10, 1.0, 0.0),
            settings(BattleMode::FieldEngagement, 1),
        );
        let report = battle.run_seeded(5);

        // A strikes first at full strength (10), B answers at reduced efficiency
        assert!((report.force_b.total_hp - 90.0).abs() < 1e-9);
        let b_eff = 0.2 + 0.8 * 0.9;
        assert!((report.force_a.total_hp - (100.0 - 10.0 * b_eff)).abs() < 1e-9);
    }

    #[test]
    fn test_round_counters_reset_each_round() {
        let mut battle = Battle::new(
            force("a", 1, 10, 1.0, 0.0),
            force("b", 1, 100, 0.0, 0.0),
            settings(BattleMode::DirectAssault, 5),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let first = battle.step(&mut rng).unwrap();
        let second = battle.step(&mut rng).unwrap();

        let loss_1 = first.force_b.formations[0].groups[0].round_hp_loss;
        let loss_2 = second.force_b.formations[0].groups[0].round_hp_loss;
        assert!((loss_1 - 10.0).abs() < 1e-9);
        assert!((loss_2 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_air_raid_suppression_hits_only_active_formation() {
        let bomber = Arc::new(
            UnitStats::new(
                "bomber",
                10.0,
                ArmorType::Air,
                ArmorTable::new().with(ArmorType::Unarmored, 4.0),
                ArmorTable::new(),
            )
            .unwrap(),
        );
        let flak = Arc::new(
            UnitStats::new(
                "flak",
                10.0,
                ArmorType::Unarmored,
                ArmorTable::new(),
                ArmorTable::new().with(ArmorType::Air, 1.0),
            )
            .unwrap(),
        );
        let raiders = Force::new(
            "raiders",
            vec![
                Formation::new("wing-1", vec![UnitGroup::new("bomber", bomber.clone(), 5)]),
                Formation::new("wing-2", vec![UnitGroup::new("bomber", bomber, 5)]),
            ],
        );
        let defenders = Force::new(
            "defenders",
            vec![Formation::new("flak", vec![UnitGroup::new("flak", flak, 10)])],
        );

        let mut battle = Battle::new(raiders, defenders, settings(BattleMode::AirRaid, 1));
        let report = battle.run_seeded(9);

        // Wing 1 takes the full 10 suppression, then bombs at 5 * 4.0 * 0.84
        let wing_1 = &report.force_a.formations[0].groups[0];
        assert!((wing_1.current_hp - 40.0).abs() < 1e-9);
        let flak_hp = 100.0 - 16.8;

        // Wing 2 faces flak already weakened by wing 1's bombs
        let suppression_2 = 10.0 * (0.2 + 0.8 * flak_hp / 100.0);
        let wing_2_hp = 50.0 - suppression_2;
        let wing_2 = &report.force_a.formations[1].groups[0];
        assert!((wing_2.current_hp - wing_2_hp).abs() < 1e-9);

        let bombing_2 = 5.0 * 4.0 * (0.2 + 0.8 * wing_2_hp / 50.0);
        assert!((report.force_b.total_hp - (flak_hp - bombing_2)).abs() < 1e-9);
    }

    #[test]
    fn test_air_raid_draws_suppression_per_sortie() {
        let bomber = Arc::new(
            UnitStats::new(
                "bomber",
                10.0,
                ArmorType::Air,
                ArmorTable::new().with(ArmorType::Unarmored, 2.0),
                ArmorTable::new(),
            )
            .unwrap(),
        );
        // Flak is light armor so the bombs, aimed at unarmored targets, never weaken it
        let flak = Arc::new(
            UnitStats::new(
                "flak",
                10.0,
                ArmorType::LightArmor,
                ArmorTable::new(),
                ArmorTable::new().with(ArmorType::Air, 1.0),
            )
            .unwrap(),
        );
        let barracks = infantry(0.0, 0.0);

        // Round order: attack, defense, then one suppression factor per wing
        let draws = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            [
                roll_factor(&mut rng, true),
                roll_factor(&mut rng, true),
                roll_factor(&mut rng, true),
                roll_factor(&mut rng, true),
            ]
        };
        let seed = (0..100u64)
            .find(|&seed| {
                let [attack, defense, s1, s2] = draws(seed);
                s1 != s2 && s1 != defense && s2 != defense && attack != defense
            })
            .unwrap();
        let [attack, _, s1, s2] = draws(seed);

        let raiders = Force::new(
            "raiders",
            vec![
                Formation::new("wing-1", vec![UnitGroup::new("bomber", bomber.clone(), 10)]),
                Formation::new("wing-2", vec![UnitGroup::new("bomber", bomber, 10)]),
            ],
        );
        let defenders = Force::new(
            "defenders",
            vec![Formation::new(
                "base",
                vec![
                    UnitGroup::new("flak", flak, 10),
                    UnitGroup::new("barracks", barracks, 90),
                ],
            )],
        );
        let mut battle = Battle::new(
            raiders,
            defenders,
            BattleSettings {
                mode: BattleMode::AirRaid,
                max_rounds: 1,
                randomness: true,
            },
        );
        let report = battle.run_seeded(seed);

        // Each wing absorbs 10 flak * 1.0 scaled by its own suppression draw
        let wing_1 = &report.force_a.formations[0].groups[0];
        let wing_2 = &report.force_a.formations[1].groups[0];
        assert!((wing_1.round_hp_loss - 10.0 * s1).abs() < 1e-9);
        assert!((wing_2.round_hp_loss - 10.0 * s2).abs() < 1e-9);

        // Both bombing runs use the round's attack factor; barracks hold 90 of 100 individuals
        let bombing = |hp: f64| 10.0 * 2.0 * (0.2 + 0.8 * hp / 100.0) * attack;
        let expected = 0.9 * (bombing(wing_1.current_hp) + bombing(wing_2.current_hp));
        let groups = &report.force_b.formations[0].groups;
        assert_eq!(groups[0].round_hp_loss, 0.0);
        assert!((groups[1].round_hp_loss - expected).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let make = || {
            Battle::new(
                force("a", 2, 30, 3.0, 1.0),
                force("b", 3, 20, 2.0, 2.0),
                BattleSettings {
                    mode: BattleMode::FieldEngagement,
                    max_rounds: 20,
                    randomness: true,
                },
            )
        };
        let first = make().run_seeded(42);
        let second = make().run_seeded(42);
        assert_eq!(first, second);
    }
}
