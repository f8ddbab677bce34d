//! Forces and formations - The two sides of a battle

mod formation;
mod output;

pub use formation::Formation;
pub use output::{damage_profile, engaged_output, ENGAGEMENT_LIMIT};

use crate::types::{ArmorTable, ArmorType, DamageKind};
use crate::unit::UnitGroup;
use std::collections::BTreeSet;

/// Potential damage by armor classification plus siege damage
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForceOutput {
    /// Damage projected against each armor classification
    pub potential: ArmorTable,
    /// Damage projected against fortifications
    pub siege: f64,
}

/// One belligerent side: an ordered collection of formations
#[derive(Debug, Clone)]
pub struct Force {
    name: String,
    formations: Vec<Formation>,
}

impl Force {
    pub fn new(name: impl Into<String>, formations: Vec<Formation>) -> Self {
        Force {
            name: name.into(),
            formations,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formations(&self) -> &[Formation] {
        &self.formations
    }

    pub(crate) fn formation_mut(&mut self, index: usize) -> Option<&mut Formation> {
        self.formations.get_mut(index)
    }

    /// Every group of every formation, in formation order
    ///
    /// This is the pooled view used for force-wide output; groups keep their
    /// own elite and terrain attributes.
    pub fn groups(&self) -> impl Iterator<Item = &UnitGroup> + Clone {
        self.formations.iter().flat_map(|f| f.groups().iter())
    }

    pub fn total_hp(&self) -> f64 {
        self.formations.iter().map(Formation::total_hp).sum()
    }

    pub fn total_count(&self) -> u64 {
        self.formations.iter().map(Formation::total_count).sum()
    }

    /// A force is alive while any of its formations is
    pub fn is_alive(&self) -> bool {
        self.formations.iter().any(Formation::is_alive)
    }

    /// Whether any formation owns a fortification
    pub fn has_fortification(&self) -> bool {
        self.formations.iter().any(|f| f.fortification().is_some())
    }

    /// Union of live armor classifications across all formations
    pub fn present_armor_types(&self) -> BTreeSet<ArmorType> {
        self.formations
            .iter()
            .flat_map(Formation::present_armor_types)
            .collect()
    }

    pub fn reset_round_stats(&mut self) {
        for formation in &mut self.formations {
            formation.reset_round_stats();
        }
    }

    /// Pooled output of the whole force against an opposing force
    ///
    /// Every armor classification present in `target` gets an entry, and
    /// siege damage is computed against [`ArmorType::Building`]. All entries
    /// share the same `factor`. A defeated force projects nothing.
    pub fn compute_output(&self, target: &Force, kind: DamageKind, factor: f64) -> ForceOutput {
        if !self.is_alive() {
            return ForceOutput::default();
        }
        let potential = damage_profile(self.groups(), kind, target.present_armor_types(), factor);
        let siege =
            engaged_output(self.groups(), kind, ArmorType::Building, ENGAGEMENT_LIMIT) * factor;
        ForceOutput { potential, siege }
    }

    /// Distribute incoming damage across all formations
    ///
    /// Group weights use the force-wide count, taken once before any damage
    /// lands. Each formation's own mitigation applies to its groups, and
    /// siege damage hits every fortification unmitigated.
    pub fn receive_damage(&mut self, incoming: &ForceOutput) {
        let total_count = self.total_count();
        if total_count == 0 {
            return;
        }
        for formation in &mut self.formations {
            formation.receive_distribution(&incoming.potential, total_count);
            formation.take_siege_damage(incoming.siege);
        }
    }
}
