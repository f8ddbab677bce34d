//! Building catalog loading

use super::ConfigError;
use crate::defense::{Fortification, FortificationLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Raw building definition: every level the building can be built to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingDefinition {
    pub levels: Vec<FortificationLevel>,
}

/// Building types by identifier
#[derive(Debug, Clone, Default)]
pub struct BuildingCatalog {
    buildings: HashMap<String, BuildingDefinition>,
}

impl BuildingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(buildings: HashMap<String, BuildingDefinition>) -> Self {
        BuildingCatalog { buildings }
    }

    pub fn register(&mut self, id: impl Into<String>, definition: BuildingDefinition) {
        self.buildings.insert(id.into(), definition);
    }

    pub fn get(&self, id: &str) -> Option<&BuildingDefinition> {
        self.buildings.get(id)
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Build a fortification of `id` up to `level`
    ///
    /// Only catalog levels at or below `level` are used. Starting hit points
    /// are `current_hp` if given, else `hp_ratio` of the maximum, else full.
    /// Returns `Ok(None)` with a warning if the building is unknown or no
    /// level qualifies.
    pub fn instantiate(
        &self,
        id: &str,
        level: u32,
        current_hp: Option<f64>,
        hp_ratio: Option<f64>,
    ) -> Result<Option<Fortification>, ConfigError> {
        let Some(definition) = self.get(id) else {
            tracing::warn!(building = id, "skipping unknown building");
            return Ok(None);
        };

        let levels: Vec<FortificationLevel> = definition
            .levels
            .iter()
            .filter(|l| l.level <= level)
            .copied()
            .collect();
        if levels.is_empty() {
            tracing::warn!(building = id, level, "no building levels at or below requested level");
            return Ok(None);
        }

        let fortification = Fortification::new(format!("{} Lv{}", id, level), levels)?;
        let fortification = match (current_hp, hp_ratio) {
            (Some(hp), _) => fortification.with_current_hp(hp)?,
            (None, Some(ratio)) => fortification.with_hp_ratio(ratio)?,
            (None, None) => fortification,
        };
        Ok(Some(fortification))
    }

    /// Load a catalog file (`.json` or `.toml`)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::from_definitions(super::load_file(path)?))
    }

    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_definitions(super::parse_toml(content)?))
    }

    pub fn parse_json(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_definitions(super::parse_json(content)?))
    }
}
