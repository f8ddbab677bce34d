//! Combat resolution - Clashes, random factors and the battle round loop

mod battle;
mod clash;
mod factor;
mod report;

pub use battle::{Battle, BattleSettings, DEFAULT_MAX_ROUNDS};
pub use clash::{resolve_air_sortie, resolve_clash, ClashOutcome};
pub use factor::{roll_factor, FACTOR_MAX, FACTOR_MEAN, FACTOR_MIN, FACTOR_SIGMA};
pub use report::{
    BattleOutcome, BattleReport, ForceSnapshot, FormationSnapshot, FortificationSnapshot,
    GroupSnapshot, RoundReport,
};
