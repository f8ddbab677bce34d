//! Formation - A named cluster of unit groups with optional fortification

use super::output::engaged_output;
use crate::defense::{apply_mitigation, total_mitigation, Fortification};
use crate::types::{ArmorTable, ArmorType, DamageKind};
use crate::unit::UnitGroup;
use std::collections::BTreeSet;

/// A sub-command of a force
///
/// The elite flag here is independent of the groups' own elite flags: it
/// marks the formation as holding core territory and grants mitigation.
#[derive(Debug, Clone)]
pub struct Formation {
    name: String,
    groups: Vec<UnitGroup>,
    fortification: Option<Fortification>,
    is_elite: bool,
}

impl Formation {
    pub fn new(name: impl Into<String>, groups: Vec<UnitGroup>) -> Self {
        Formation {
            name: name.into(),
            groups,
            fortification: None,
            is_elite: false,
        }
    }

    pub fn with_fortification(mut self, fortification: Fortification) -> Self {
        self.fortification = Some(fortification);
        self
    }

    pub fn with_elite(mut self, is_elite: bool) -> Self {
        self.is_elite = is_elite;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn groups(&self) -> &[UnitGroup] {
        &self.groups
    }

    pub fn fortification(&self) -> Option<&Fortification> {
        self.fortification.as_ref()
    }

    pub fn is_elite(&self) -> bool {
        self.is_elite
    }

    /// Sum of current hit points across groups
    pub fn total_hp(&self) -> f64 {
        self.groups.iter().map(UnitGroup::current_hp).sum()
    }

    /// Sum of live individuals across groups
    ///
    /// Widened to `u64`: each group may hold up to `u32::MAX` individuals.
    pub fn total_count(&self) -> u64 {
        self.groups.iter().map(|g| u64::from(g.count())).sum()
    }

    pub fn is_alive(&self) -> bool {
        self.total_hp() > 0.0 && self.groups.iter().any(|g| g.count() > 0)
    }

    /// Armor classifications of live groups
    pub fn present_armor_types(&self) -> BTreeSet<ArmorType> {
        self.groups
            .iter()
            .filter(|g| g.is_alive())
            .map(UnitGroup::armor_type)
            .collect()
    }

    /// Fortification mitigation plus elite bonus, clamped to `[0, 1]`
    pub fn total_mitigation(&self) -> f64 {
        total_mitigation(self.fortification.as_ref(), self.is_elite)
    }

    /// Engagement-capped output of this formation alone
    pub fn calculate_output(&self, kind: DamageKind, target: ArmorType, limit: u32) -> f64 {
        engaged_output(&self.groups, kind, target, limit)
    }

    /// Distribute potential damage across live groups
    ///
    /// Each group's share is weighted by its count over `total_count`, which
    /// is the count of whichever scope the caller is distributing over (the
    /// whole force, or this formation alone for counter-damage). The
    /// formation's own mitigation is read once, before any group absorbs.
    pub fn receive_distribution(&mut self, potential: &ArmorTable, total_count: u64) {
        if total_count == 0 {
            return;
        }
        let mitigation = self.total_mitigation();

        for group in self.groups.iter_mut().filter(|g| g.is_alive()) {
            let weight = group.count() as f64 / total_count as f64;
            let raw = potential.get(group.armor_type()) * weight;
            group.absorb(apply_mitigation(raw, mitigation));
        }
    }

    /// Apply siege damage to the fortification, bypassing mitigation
    pub fn take_siege_damage(&mut self, damage: f64) {
        if let Some(fortification) = self.fortification.as_mut() {
            fortification.take_damage(damage);
        }
    }

    pub fn reset_round_stats(&mut self) {
        for group in &mut self.groups {
            group.reset_round_stats();
        }
    }
}
