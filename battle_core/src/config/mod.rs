//! Configuration loading from TOML or JSON files
//!
//! A scenario is three files: a unit catalog, a building catalog and a battle
//! description that places catalog entries into two forces.

mod buildings;
mod scenario;
mod units;

pub use buildings::{BuildingCatalog, BuildingDefinition};
pub use scenario::{
    BattleConfig, BuildingPlacement, FormationConfig, Scenario, TeamConfig, UnitPlacement,
};
pub use units::{UnitCatalog, UnitDefinition};

use crate::error::BattleError;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
    #[error("Invalid battle entity: {0}")]
    InvalidEntity(#[from] BattleError),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load a JSON string and deserialize it
pub fn parse_json<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = serde_json::from_str(content)?;
    Ok(config)
}

/// Load a file as JSON if it has a `.json` extension, TOML otherwise
pub fn load_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_json(&content)
    } else {
        parse_toml(&content)
    }
}

/// Find `<stem>.toml` or `<stem>.json` inside a directory, trying stems in order
fn find_config_file(dir: &Path, stems: &[&str]) -> Option<PathBuf> {
    stems.iter().find_map(|stem| {
        ["toml", "json"]
            .iter()
            .map(|ext| dir.join(format!("{}.{}", stem, ext)))
            .find(|path| path.is_file())
    })
}

/// Load a scenario from a directory
///
/// Expects `units`, `battle` (or `battle_config`) and optionally `buildings`,
/// each as `.toml` or `.json`.
pub fn load_scenario_dir(dir: &Path) -> Result<Scenario, ConfigError> {
    let units_path = find_config_file(dir, &["units"]).ok_or_else(|| {
        ConfigError::ValidationError(format!("no units.toml or units.json in {}", dir.display()))
    })?;
    let battle_path = find_config_file(dir, &["battle", "battle_config"]).ok_or_else(|| {
        ConfigError::ValidationError(format!("no battle.toml or battle.json in {}", dir.display()))
    })?;

    let units = UnitCatalog::load(&units_path)?;
    let buildings = match find_config_file(dir, &["buildings"]) {
        Some(path) => BuildingCatalog::load(&path)?,
        None => BuildingCatalog::default(),
    };
    let battle: BattleConfig = load_file(&battle_path)?;

    Ok(Scenario::new(units, buildings, battle))
}
