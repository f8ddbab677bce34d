//! Output aggregation - Engagement-capped damage of a pool of groups
//!
//! A pool is any set of groups, whether a single formation or every group of
//! a force viewed together. Only `limit` individuals engage per computation,
//! and the hardest hitters engage first.

use crate::types::{ArmorTable, ArmorType, DamageKind};
use crate::unit::UnitGroup;

/// Default number of individuals that engage in one computation
pub const ENGAGEMENT_LIMIT: u32 = 10;

/// Engagement-capped output of a pool of groups against one armor classification
///
/// Candidates are live groups with positive per-individual output, sorted
/// descending by that output (stable, so ties keep encounter order). Groups
/// are consumed greedily until `limit` individuals have been counted.
pub fn engaged_output<'a, I>(groups: I, kind: DamageKind, target: ArmorType, limit: u32) -> f64
where
    I: IntoIterator<Item = &'a UnitGroup>,
{
    let mut candidates: Vec<(f64, u32)> = groups
        .into_iter()
        .filter(|g| g.count() > 0)
        .map(|g| (g.damage_output(kind, target), g.count()))
        .filter(|(damage, _)| *damage > 0.0)
        .collect();

    // Vec::sort_by is stable
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut total = 0.0;
    let mut left = limit;
    for (unit_damage, count) in candidates {
        if left == 0 {
            break;
        }
        let take = left.min(count);
        total += take as f64 * unit_damage;
        left -= take;
    }
    total
}

/// Engagement-capped output against each of the given armor classifications
///
/// Every entry is scaled by `factor`; classifications not listed stay zero.
pub fn damage_profile<'a, I, A>(groups: I, kind: DamageKind, targets: A, factor: f64) -> ArmorTable
where
    I: IntoIterator<Item = &'a UnitGroup> + Clone,
    A: IntoIterator<Item = ArmorType>,
{
    targets
        .into_iter()
        .map(|armor| {
            let base = engaged_output(groups.clone(), kind, armor, ENGAGEMENT_LIMIT);
            (armor, base * factor)
        })
        .collect()
}
