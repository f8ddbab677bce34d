//! UnitStats - Immutable combat unit type template

use crate::error::BattleError;
use crate::types::{ArmorTable, ArmorType, DamageKind};
use serde::{Deserialize, Serialize};

/// Static stat template shared by every group of one unit type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Unit type name
    pub name: String,
    /// Hit points of one individual
    pub hp: f64,
    /// Armor classification of this unit type
    pub armor_type: ArmorType,
    /// Base attack damage by opposing armor classification
    pub attack: ArmorTable,
    /// Base defense damage by opposing armor classification
    pub defense: ArmorTable,
}

impl UnitStats {
    /// Create a unit type, rejecting non-positive hit points
    pub fn new(
        name: impl Into<String>,
        hp: f64,
        armor_type: ArmorType,
        attack: ArmorTable,
        defense: ArmorTable,
    ) -> Result<Self, BattleError> {
        let name = name.into();
        if !hp.is_finite() || hp <= 0.0 {
            return Err(BattleError::InvalidUnitHp { name, hp });
        }
        Ok(UnitStats {
            name,
            hp,
            armor_type,
            attack,
            defense,
        })
    }

    /// Table used for the given damage kind
    pub fn table(&self, kind: DamageKind) -> &ArmorTable {
        match kind {
            DamageKind::Attack => &self.attack,
            DamageKind::Defense => &self.defense,
        }
    }

    /// Base damage of one individual against an armor classification
    pub fn base_damage(&self, kind: DamageKind, target: ArmorType) -> f64 {
        self.table(kind).get(target)
    }
}
