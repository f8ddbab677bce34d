//! Battle snapshots - Read-only views handed to reporting
//!
//! Snapshots are plain data captured between rounds. The core never formats
//! them; front ends render them however they like.

use crate::defense::Fortification;
use crate::force::{Force, Formation};
use crate::types::{ArmorType, BattleMode};
use crate::unit::UnitGroup;
use serde::{Deserialize, Serialize};

/// State of one unit group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub name: String,
    pub unit_type: String,
    pub armor_type: ArmorType,
    pub is_elite: bool,
    pub count: u32,
    pub initial_count: u32,
    pub current_hp: f64,
    pub initial_hp: f64,
    /// Capacity of the surviving individuals
    pub max_hp: f64,
    pub hp_ratio: f64,
    /// Hit points lost this round
    pub round_hp_loss: f64,
    /// Individuals killed this round
    pub round_dead: u32,
}

impl GroupSnapshot {
    pub fn capture(group: &UnitGroup) -> Self {
        GroupSnapshot {
            name: group.name().to_string(),
            unit_type: group.stats().name.clone(),
            armor_type: group.armor_type(),
            is_elite: group.is_elite(),
            count: group.count(),
            initial_count: group.initial_count(),
            current_hp: group.current_hp(),
            initial_hp: group.initial_hp(),
            max_hp: group.max_hp(),
            hp_ratio: group.hp_ratio(),
            round_hp_loss: group.round_hp_loss(),
            round_dead: group.round_dead(),
        }
    }

    /// Hit points lost since the start of the battle
    pub fn hp_lost(&self) -> f64 {
        self.initial_hp - self.current_hp
    }

    /// Individuals lost since the start of the battle
    pub fn count_lost(&self) -> u32 {
        self.initial_count.saturating_sub(self.count)
    }

    /// Whether anything happened to this group this round
    pub fn had_losses(&self) -> bool {
        self.round_hp_loss > 0.001 || self.round_dead > 0
    }

    /// This round's loss as a percentage of the hit points held at round start
    pub fn round_loss_percent(&self) -> f64 {
        let before = self.current_hp + self.round_hp_loss;
        if before <= 0.0 {
            return 0.0;
        }
        self.round_hp_loss / before * 100.0
    }
}

/// State of a fortification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FortificationSnapshot {
    pub name: String,
    pub current_hp: f64,
    pub initial_hp: f64,
    pub max_hp: f64,
    /// Current mitigation as a percentage
    pub mitigation_percent: f64,
}

impl FortificationSnapshot {
    pub fn capture(fortification: &Fortification) -> Self {
        FortificationSnapshot {
            name: fortification.name().to_string(),
            current_hp: fortification.current_hp(),
            initial_hp: fortification.initial_hp(),
            max_hp: fortification.max_hp(),
            mitigation_percent: fortification.current_mitigation() * 100.0,
        }
    }

    pub fn hp_lost(&self) -> f64 {
        self.initial_hp - self.current_hp
    }
}

/// State of a formation and its groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationSnapshot {
    pub name: String,
    pub is_elite: bool,
    pub is_alive: bool,
    /// Combined mitigation as a percentage
    pub mitigation_percent: f64,
    pub fortification: Option<FortificationSnapshot>,
    pub groups: Vec<GroupSnapshot>,
}

impl FormationSnapshot {
    pub fn capture(formation: &Formation) -> Self {
        FormationSnapshot {
            name: formation.name().to_string(),
            is_elite: formation.is_elite(),
            is_alive: formation.is_alive(),
            mitigation_percent: formation.total_mitigation() * 100.0,
            fortification: formation.fortification().map(FortificationSnapshot::capture),
            groups: formation.groups().iter().map(GroupSnapshot::capture).collect(),
        }
    }
}

/// State of a whole force
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceSnapshot {
    pub name: String,
    pub is_alive: bool,
    pub total_hp: f64,
    pub total_count: u64,
    pub formations: Vec<FormationSnapshot>,
}

impl ForceSnapshot {
    pub fn capture(force: &Force) -> Self {
        ForceSnapshot {
            name: force.name().to_string(),
            is_alive: force.is_alive(),
            total_hp: force.total_hp(),
            total_count: force.total_count(),
            formations: force.formations().iter().map(FormationSnapshot::capture).collect(),
        }
    }

    /// All groups with their formation, in order
    pub fn groups(&self) -> impl Iterator<Item = (&FormationSnapshot, &GroupSnapshot)> {
        self.formations
            .iter()
            .flat_map(|f| f.groups.iter().map(move |g| (f, g)))
    }

    /// Hit points lost since the start of the battle
    pub fn total_hp_lost(&self) -> f64 {
        self.groups().map(|(_, g)| g.hp_lost()).sum()
    }

    /// Individuals lost since the start of the battle
    pub fn total_count_lost(&self) -> u64 {
        self.groups().map(|(_, g)| u64::from(g.count_lost())).sum()
    }
}

/// Snapshot of both forces after one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u32,
    pub attack_factor: f64,
    pub defense_factor: f64,
    pub force_a: ForceSnapshot,
    pub force_b: ForceSnapshot,
}

/// How a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    /// Force B was wiped out
    AttackerVictory,
    /// Force A was wiped out
    DefenderVictory,
    /// Both forces were wiped out
    MutualDestruction,
    /// The round cap was reached with both forces standing
    RoundLimit,
}

impl BattleOutcome {
    pub fn from_survivors(a_alive: bool, b_alive: bool) -> Self {
        match (a_alive, b_alive) {
            (true, false) => BattleOutcome::AttackerVictory,
            (false, true) => BattleOutcome::DefenderVictory,
            (false, false) => BattleOutcome::MutualDestruction,
            (true, true) => BattleOutcome::RoundLimit,
        }
    }
}

/// Full result of a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub mode: BattleMode,
    pub rounds_fought: u32,
    pub outcome: BattleOutcome,
    pub rounds: Vec<RoundReport>,
    pub force_a: ForceSnapshot,
    pub force_b: ForceSnapshot,
}
