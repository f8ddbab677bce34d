//! Unit catalog loading

use super::ConfigError;
use crate::types::{ArmorTable, ArmorType};
use crate::unit::UnitStats;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Raw unit definition as written in a catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// Hit points of one individual
    pub hp: f64,
    /// Armor classification name
    pub armor_type: String,
    /// Attack values keyed by armor classification name
    #[serde(default)]
    pub attack: BTreeMap<String, f64>,
    /// Defense values keyed by armor classification name
    #[serde(default)]
    pub defense: BTreeMap<String, f64>,
}

impl UnitDefinition {
    /// Convert into validated unit stats
    ///
    /// Unknown keys in the attack and defense tables are dropped with a
    /// warning; an unknown armor classification for the unit itself is an error.
    pub fn to_stats(&self, id: &str) -> Result<UnitStats, ConfigError> {
        let armor_type: ArmorType = self.armor_type.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "unit '{}' has unknown armor type '{}'",
                id, self.armor_type
            ))
        })?;
        let attack = armor_table(id, "attack", &self.attack)?;
        let defense = armor_table(id, "defense", &self.defense)?;
        Ok(UnitStats::new(id, self.hp, armor_type, attack, defense)?)
    }
}

fn armor_table(
    id: &str,
    table: &str,
    values: &BTreeMap<String, f64>,
) -> Result<ArmorTable, ConfigError> {
    let mut result = ArmorTable::new();
    for (key, &value) in values {
        let Ok(armor) = key.parse::<ArmorType>() else {
            tracing::warn!(unit = id, table, key = key.as_str(), "skipping unknown armor type");
            continue;
        };
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "unit '{}' {} value against '{}' must be non-negative, got {}",
                id, table, key, value
            )));
        }
        result.set(armor, value);
    }
    Ok(result)
}

/// Unit types by identifier
#[derive(Debug, Clone, Default)]
pub struct UnitCatalog {
    units: HashMap<String, Arc<UnitStats>>,
}

impl UnitCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a set of definitions
    pub fn from_definitions(
        definitions: BTreeMap<String, UnitDefinition>,
    ) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        for (id, definition) in definitions {
            let stats = definition.to_stats(&id)?;
            catalog.register(stats);
        }
        Ok(catalog)
    }

    /// Register a unit type under its own name
    pub fn register(&mut self, stats: UnitStats) {
        self.units.insert(stats.name.clone(), Arc::new(stats));
    }

    /// Get a unit type by identifier
    pub fn get(&self, id: &str) -> Option<Arc<UnitStats>> {
        self.units.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Load a catalog file (`.json` or `.toml`)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let definitions: BTreeMap<String, UnitDefinition> = super::load_file(path)?;
        Self::from_definitions(definitions)
    }

    /// Parse a TOML catalog
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        Self::from_definitions(super::parse_toml(content)?)
    }

    /// Parse a JSON catalog
    pub fn parse_json(content: &str) -> Result<Self, ConfigError> {
        Self::from_definitions(super::parse_json(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units_toml() {
        let toml = r#"
[infantry]
hp = 10.0
armor_type = "unarmored"

[infantry.attack]
unarmored = 2.0
light_armor = 1.0
building = 0.5

[infantry.defense]
unarmored = 1.5

[fighter]
hp = 25.0
armor_type = "Air"

[fighter.attack]
Air = 4.0
"#;

        let catalog = UnitCatalog::parse_toml(toml).unwrap();
        assert_eq!(catalog.len(), 2);

        let infantry = catalog.get("infantry").unwrap();
        assert_eq!(infantry.armor_type, ArmorType::Unarmored);
        assert!((infantry.attack.get(ArmorType::Building) - 0.5).abs() < f64::EPSILON);
        assert!((infantry.defense.get(ArmorType::Unarmored) - 1.5).abs() < f64::EPSILON);

        let fighter = catalog.get("fighter").unwrap();
        assert_eq!(fighter.armor_type, ArmorType::Air);
    }

    #[test]
    fn test_parse_units_json_original_names() {
        let json = r#"{
            "Tank": {
                "hp": 40,
                "armor_type": "Heavy Armor",
                "attack": {"Light Armor": 3, "Heavy Armor": 5, "Cavalry": 9},
                "defense": {"Unarmored": 2}
            }
        }"#;

        let catalog = UnitCatalog::parse_json(json).unwrap();
        let tank = catalog.get("Tank").unwrap();
        assert_eq!(tank.armor_type, ArmorType::HeavyArmor);
        assert!((tank.attack.get(ArmorType::HeavyArmor) - 5.0).abs() < f64::EPSILON);
        // Unknown "Cavalry" key dropped
        assert_eq!(tank.attack.iter().count(), 2);
    }

    #[test]
    fn test_unknown_armor_type_rejected() {
        let json = r#"{"Ghost": {"hp": 5, "armor_type": "Ethereal"}}"#;
        assert!(matches!(
            UnitCatalog::parse_json(json),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_non_positive_hp_rejected() {
        let json = r#"{"Ghost": {"hp": 0, "armor_type": "Unarmored"}}"#;
        assert!(matches!(
            UnitCatalog::parse_json(json),
            Err(ConfigError::InvalidEntity(_))
        ));
    }
}
