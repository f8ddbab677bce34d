//! Battle configuration - Placing catalog entries into two forces

use super::{BuildingCatalog, ConfigError, UnitCatalog};
use crate::combat::{Battle, BattleSettings, DEFAULT_MAX_ROUNDS};
use crate::force::{Force, Formation};
use crate::types::BattleMode;
use crate::unit::UnitGroup;
use serde::{Deserialize, Serialize};

/// Top-level battle description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    pub team_a: TeamConfig,
    pub team_b: TeamConfig,
    #[serde(default)]
    pub battle_mode: BattleMode,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    #[serde(default = "default_enable_randomness")]
    pub enable_randomness: bool,
    /// Seed for a reproducible run
    #[serde(default)]
    pub seed: Option<u64>,
    /// Report every group each round, not only those that took losses
    #[serde(default)]
    pub detailed_output: bool,
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

fn default_enable_randomness() -> bool {
    true
}

impl BattleConfig {
    pub fn settings(&self) -> BattleSettings {
        BattleSettings {
            mode: self.battle_mode,
            max_rounds: self.max_rounds,
            randomness: self.enable_randomness,
        }
    }
}

/// One side of the battle
///
/// Either lists `formations` (alias `stacks`), or uses the legacy flat shape
/// with `units`, `building` and `core` directly on the team, which becomes a
/// single formation named "Main Stack".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    #[serde(default = "default_team_name")]
    pub name: String,
    #[serde(default, alias = "stacks")]
    pub formations: Vec<FormationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Vec<UnitPlacement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<BuildingPlacement>,
    #[serde(default)]
    pub core: bool,
}

fn default_team_name() -> String {
    "Unknown Army".to_string()
}

impl TeamConfig {
    /// Formations of this team, wrapping the legacy flat shape if present
    pub fn resolved_formations(&self) -> Vec<FormationConfig> {
        match &self.units {
            Some(units) => vec![FormationConfig {
                name: "Main Stack".to_string(),
                core: self.core,
                building: self.building.clone(),
                units: units.clone(),
            }],
            None => self.formations.clone(),
        }
    }
}

/// A formation within a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationConfig {
    #[serde(default = "default_formation_name")]
    pub name: String,
    /// Core territory: grants mitigation, and elite output to its groups by default
    #[serde(default)]
    pub core: bool,
    #[serde(default)]
    pub building: Option<BuildingPlacement>,
    #[serde(default)]
    pub units: Vec<UnitPlacement>,
}

fn default_formation_name() -> String {
    "Stack".to_string()
}

/// A building placed in a formation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingPlacement {
    pub id: String,
    pub level: u32,
    #[serde(default)]
    pub current_hp: Option<f64>,
    #[serde(default)]
    pub hp_ratio: Option<f64>,
}

/// A unit group placed in a formation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitPlacement {
    pub id: String,
    pub count: i64,
    #[serde(default)]
    pub terrain_bonus: f64,
    /// Elite flag of the group; defaults to the formation's `core`
    #[serde(default)]
    pub core: Option<bool>,
    #[serde(default)]
    pub current_hp: Option<f64>,
    #[serde(default)]
    pub hp_ratio: Option<f64>,
}

/// Catalogs plus battle description
#[derive(Debug, Clone)]
pub struct Scenario {
    pub units: UnitCatalog,
    pub buildings: BuildingCatalog,
    pub battle: BattleConfig,
}

impl Scenario {
    pub fn new(units: UnitCatalog, buildings: BuildingCatalog, battle: BattleConfig) -> Self {
        Scenario {
            units,
            buildings,
            battle,
        }
    }

    /// Build one force from its team description
    ///
    /// Unknown unit identifiers are skipped with a warning. Negative counts
    /// and out-of-range hit points are rejected.
    pub fn build_force(&self, team: &TeamConfig) -> Result<Force, ConfigError> {
        let formations = team
            .resolved_formations()
            .iter()
            .map(|formation| self.build_formation(formation))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Force::new(team.name.clone(), formations))
    }

    fn build_formation(&self, config: &FormationConfig) -> Result<Formation, ConfigError> {
        let mut groups = Vec::with_capacity(config.units.len());
        for placement in &config.units {
            if let Some(group) = self.build_group(placement, config.core)? {
                groups.push(group);
            }
        }

        let mut formation = Formation::new(config.name.clone(), groups).with_elite(config.core);
        if let Some(building) = &config.building {
            let fortification = self.buildings.instantiate(
                &building.id,
                building.level,
                building.current_hp,
                building.hp_ratio,
            )?;
            if let Some(fortification) = fortification {
                formation = formation.with_fortification(fortification);
            }
        }
        Ok(formation)
    }

    fn build_group(
        &self,
        placement: &UnitPlacement,
        formation_core: bool,
    ) -> Result<Option<UnitGroup>, ConfigError> {
        let Some(stats) = self.units.get(&placement.id) else {
            tracing::warn!(unit = placement.id.as_str(), "skipping unknown unit");
            return Ok(None);
        };
        let count = u32::try_from(placement.count).map_err(|_| {
            ConfigError::ValidationError(format!(
                "unit '{}' count must be between 0 and {}, got {}",
                placement.id,
                u32::MAX,
                placement.count
            ))
        })?;

        let group = UnitGroup::new(placement.id.clone(), stats, count)
            .with_terrain_bonus(placement.terrain_bonus)?
            .with_elite(placement.core.unwrap_or(formation_core));
        let group = match (placement.current_hp, placement.hp_ratio) {
            (Some(hp), _) => group.with_current_hp(hp)?,
            (None, Some(ratio)) => group.with_hp_ratio(ratio)?,
            (None, None) => group,
        };
        Ok(Some(group))
    }

    /// Build both forces
    pub fn build_forces(&self) -> Result<(Force, Force), ConfigError> {
        let force_a = self.build_force(&self.battle.team_a)?;
        let force_b = self.build_force(&self.battle.team_b)?;
        Ok((force_a, force_b))
    }

    /// Build a ready-to-run battle with the configured settings
    pub fn build_battle(&self) -> Result<Battle, ConfigError> {
        let (force_a, force_b) = self.build_forces()?;
        Ok(Battle::new(force_a, force_b, self.battle.settings()))
    }
}
