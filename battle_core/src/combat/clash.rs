//! Atomic clash and air sortie resolution
//!
//! A clash is one attacking formation against a whole target force:
//! 1. Attack: the formation's capped output against every armor type present in the target
//! 2. Siege: the same against buildings, only if the target holds any fortification
//! 3. Counter: the target's pooled defense against every armor type present in the formation
//! 4. Both are computed before either lands; the target force takes the attack,
//!    the formation alone takes the counter weighted by its own count

use crate::force::{damage_profile, Force, ForceOutput, Formation, ENGAGEMENT_LIMIT};
use crate::types::{ArmorTable, ArmorType, DamageKind};

/// Damage exchanged in one clash
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClashOutcome {
    /// Output of the active formation against the target force
    pub attack: ForceOutput,
    /// Counter-damage of the target force against the active formation
    pub counter: ArmorTable,
}

/// Resolve one atomic clash
///
/// Returns `None` without touching either side if the formation or the
/// target force is already defeated.
pub fn resolve_clash(
    active: &mut Formation,
    target: &mut Force,
    atk_factor: f64,
    def_factor: f64,
) -> Option<ClashOutcome> {
    if !active.is_alive() || !target.is_alive() {
        return None;
    }

    let attack = formation_attack(active, target, atk_factor, target.has_fortification());
    let counter = damage_profile(
        target.groups(),
        DamageKind::Defense,
        active.present_armor_types(),
        def_factor,
    );

    target.receive_damage(&attack);
    let own_count = active.total_count();
    active.receive_distribution(&counter, own_count);

    tracing::debug!(
        formation = active.name(),
        target = target.name(),
        attack = attack.potential.total(),
        siege = attack.siege,
        counter = counter.total(),
        "clash resolved"
    );

    Some(ClashOutcome { attack, counter })
}

/// Resolve one air-raid sortie for a formation
///
/// `suppression` is the defending force's pooled anti-air output, applied to
/// the formation alone. A surviving formation then bombs the target; siege
/// damage is always computed since it only lands on fortified formations.
/// Returns the bombing output, or `None` if the formation did not survive.
pub fn resolve_air_sortie(
    active: &mut Formation,
    suppression: &ForceOutput,
    target: &mut Force,
    atk_factor: f64,
) -> Option<ForceOutput> {
    let own_count = active.total_count();
    active.receive_distribution(&suppression.potential, own_count);

    if !active.is_alive() {
        tracing::debug!(formation = active.name(), "formation lost to suppression");
        return None;
    }

    let bombing = formation_attack(active, target, atk_factor, true);
    target.receive_damage(&bombing);

    tracing::debug!(
        formation = active.name(),
        target = target.name(),
        suppression = suppression.potential.total(),
        bombing = bombing.potential.total(),
        siege = bombing.siege,
        "air sortie resolved"
    );

    Some(bombing)
}

fn formation_attack(active: &Formation, target: &Force, factor: f64, with_siege: bool) -> ForceOutput {
    let potential = damage_profile(
        active.groups(),
        DamageKind::Attack,
        target.present_armor_types(),
        factor,
    );
    let siege = if with_siege {
        active.calculate_output(DamageKind::Attack, ArmorType::Building, ENGAGEMENT_LIMIT) * factor
    } else {
        0.0
    };
    ForceOutput { potential, siege }
}
