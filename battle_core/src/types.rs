//! Core enumerations shared by every battle component

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Armor classification of a combat unit type
///
/// Attack and defense values are always looked up against the armor
/// classification of the opposing group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorType {
    #[serde(alias = "Unarmored")]
    Unarmored,
    #[serde(alias = "Light Armor")]
    LightArmor,
    #[serde(alias = "Heavy Armor")]
    HeavyArmor,
    #[serde(alias = "Air")]
    Air,
    #[serde(alias = "Ship")]
    Ship,
    #[serde(alias = "Submarine")]
    Submarine,
    #[serde(alias = "Building")]
    Building,
}

impl ArmorType {
    /// Number of armor classifications
    pub const COUNT: usize = 7;

    /// Get all armor classifications
    pub fn all() -> &'static [ArmorType] {
        &[
            ArmorType::Unarmored,
            ArmorType::LightArmor,
            ArmorType::HeavyArmor,
            ArmorType::Air,
            ArmorType::Ship,
            ArmorType::Submarine,
            ArmorType::Building,
        ]
    }

    /// Slot of this classification inside an [`ArmorTable`]
    pub fn index(self) -> usize {
        match self {
            ArmorType::Unarmored => 0,
            ArmorType::LightArmor => 1,
            ArmorType::HeavyArmor => 2,
            ArmorType::Air => 3,
            ArmorType::Ship => 4,
            ArmorType::Submarine => 5,
            ArmorType::Building => 6,
        }
    }

    /// Human-readable name, as used by the original data files
    pub fn display_name(self) -> &'static str {
        match self {
            ArmorType::Unarmored => "Unarmored",
            ArmorType::LightArmor => "Light Armor",
            ArmorType::HeavyArmor => "Heavy Armor",
            ArmorType::Air => "Air",
            ArmorType::Ship => "Ship",
            ArmorType::Submarine => "Submarine",
            ArmorType::Building => "Building",
        }
    }
}

impl fmt::Display for ArmorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when an armor classification string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown armor type: {0}")]
pub struct UnknownArmorType(pub String);

impl FromStr for ArmorType {
    type Err = UnknownArmorType;

    /// Accepts both display names ("Light Armor") and snake_case ("light_armor")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "unarmored" => Ok(ArmorType::Unarmored),
            "light_armor" => Ok(ArmorType::LightArmor),
            "heavy_armor" => Ok(ArmorType::HeavyArmor),
            "air" => Ok(ArmorType::Air),
            "ship" => Ok(ArmorType::Ship),
            "submarine" => Ok(ArmorType::Submarine),
            "building" => Ok(ArmorType::Building),
            _ => Err(UnknownArmorType(s.to_string())),
        }
    }
}

/// Which value table a group fights with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    Attack,
    Defense,
}

/// Turn-ordering rules for a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BattleMode {
    /// Force A's formations each assault Force B in order
    #[default]
    #[serde(rename = "LAND_ATTACK", alias = "land_attack", alias = "direct_assault")]
    DirectAssault,
    /// Both forces' formations alternate clashes (A0, B0, A1, B1, ...)
    #[serde(rename = "LAND_MEET", alias = "land_meet", alias = "field_engagement")]
    FieldEngagement,
    /// Force A's formations absorb anti-air fire, then bomb Force B
    #[serde(rename = "AIR_STRIKE", alias = "air_strike", alias = "air_raid")]
    AirRaid,
}

impl BattleMode {
    /// Identifier used in configuration files
    pub fn config_name(self) -> &'static str {
        match self {
            BattleMode::DirectAssault => "LAND_ATTACK",
            BattleMode::FieldEngagement => "LAND_MEET",
            BattleMode::AirRaid => "AIR_STRIKE",
        }
    }
}

impl fmt::Display for BattleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

impl FromStr for BattleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "land_attack" | "direct_assault" => Ok(BattleMode::DirectAssault),
            "land_meet" | "field_engagement" => Ok(BattleMode::FieldEngagement),
            "air_strike" | "air_raid" => Ok(BattleMode::AirRaid),
            other => Err(format!("unknown battle mode: {}", other)),
        }
    }
}

/// A value per armor classification; missing entries read as zero
///
/// Used both for unit attack/defense tables and for the potential damage a
/// force projects against each armor classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<ArmorType, f64>", into = "BTreeMap<ArmorType, f64>")]
pub struct ArmorTable {
    values: [f64; ArmorType::COUNT],
}

impl ArmorTable {
    /// Create an empty table (all zeros)
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for the given armor classification
    pub fn get(&self, armor: ArmorType) -> f64 {
        self.values[armor.index()]
    }

    /// Set the value for an armor classification
    pub fn set(&mut self, armor: ArmorType, value: f64) {
        self.values[armor.index()] = value;
    }

    /// Builder-style setter
    pub fn with(mut self, armor: ArmorType, value: f64) -> Self {
        self.set(armor, value);
        self
    }

    /// Iterate over non-zero entries in classification order
    pub fn iter(&self) -> impl Iterator<Item = (ArmorType, f64)> + '_ {
        ArmorType::all()
            .iter()
            .map(move |&armor| (armor, self.get(armor)))
            .filter(|(_, value)| *value != 0.0)
    }

    /// Sum of all entries
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl From<BTreeMap<ArmorType, f64>> for ArmorTable {
    fn from(map: BTreeMap<ArmorType, f64>) -> Self {
        map.into_iter()
            .fold(ArmorTable::new(), |table, (armor, value)| table.with(armor, value))
    }
}

impl From<ArmorTable> for BTreeMap<ArmorType, f64> {
    fn from(table: ArmorTable) -> Self {
        table.iter().collect()
    }
}

impl FromIterator<(ArmorType, f64)> for ArmorTable {
    fn from_iter<I: IntoIterator<Item = (ArmorType, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ArmorTable::new(), |table, (armor, value)| table.with(armor, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_armor_from_display_and_snake_case() {
        assert_eq!("Light Armor".parse::<ArmorType>(), Ok(ArmorType::LightArmor));
        assert_eq!("heavy_armor".parse::<ArmorType>(), Ok(ArmorType::HeavyArmor));
        assert_eq!("Submarine".parse::<ArmorType>(), Ok(ArmorType::Submarine));
        assert!("Cavalry".parse::<ArmorType>().is_err());
    }

    #[test]
    fn test_armor_index_is_unique() {
        let mut seen = [false; ArmorType::COUNT];
        for armor in ArmorType::all() {
            assert!(!seen[armor.index()]);
            seen[armor.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_armor_table_missing_is_zero() {
        let table = ArmorTable::new().with(ArmorType::Air, 3.5);
        assert!((table.get(ArmorType::Air) - 3.5).abs() < f64::EPSILON);
        assert_eq!(table.get(ArmorType::Ship), 0.0);
        assert_eq!(table.iter().count(), 1);
    }

    #[test]
    fn test_armor_table_deserializes_from_map() {
        let json = r#"{"Light Armor": 2.0, "building": 4.0}"#;
        let table: ArmorTable = serde_json::from_str(json).unwrap();
        assert!((table.get(ArmorType::LightArmor) - 2.0).abs() < f64::EPSILON);
        assert!((table.get(ArmorType::Building) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_battle_mode_names() {
        let mode: BattleMode = serde_json::from_str("\"LAND_MEET\"").unwrap();
        assert_eq!(mode, BattleMode::FieldEngagement);
        assert_eq!("air_raid".parse::<BattleMode>(), Ok(BattleMode::AirRaid));
        assert_eq!(BattleMode::default(), BattleMode::DirectAssault);
    }
}
