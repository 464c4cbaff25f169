//! Per-level difficulty settings
//!
//! Absolute spawn counts, goals and environment values that a level reads
//! for the selected tier. Unlike catalog stats these are not multipliers.
//! The one exception is the time limit: a tier that leaves it out gets
//! [`DEFAULT_TIME_LIMIT`] scaled by the tier's `TimeLimit` value.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, DifficultyTier, StatKey};
use super::resolver::resolve;
use crate::error::CatalogError;

const DEFAULT_LEVELS_RON: &str = include_str!("../../assets/levels.ron");

/// Seconds, before the tier's `TimeLimit` multiplier
pub const DEFAULT_TIME_LIMIT: f32 = 300.0;

/// Settings one level uses at one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    // Enemies
    pub enemy_count: u32,
    pub enemy_spawn_rate: f32,
    pub enable_elite_enemies: bool,

    // Hazards
    pub hazard_count: u32,

    // Pickups
    pub health_pickup_count: u32,
    pub point_pickup_count: u32,

    // Goals
    pub score_goal: u32,
    /// Seconds. `None` until resolved against a tier.
    pub time_limit: Option<f32>,
    pub materials_required: u32,

    // Oxygen (underwater levels)
    pub max_oxygen: f32,
    pub oxygen_drain_rate: f32,
    pub oxygen_refill_rate: f32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            enemy_count: 5,
            enemy_spawn_rate: 1.0,
            enable_elite_enemies: false,
            hazard_count: 3,
            health_pickup_count: 2,
            point_pickup_count: 10,
            score_goal: 100,
            time_limit: None,
            materials_required: 5,
            max_oxygen: 10.0,
            oxygen_drain_rate: 1.0,
            oxygen_refill_rate: 3.0,
        }
    }
}

impl LevelSettings {
    /// Time limit in seconds, the unscaled default when unresolved
    pub fn time_limit(&self) -> f32 {
        self.time_limit.unwrap_or(DEFAULT_TIME_LIMIT)
    }

    /// Fill in an omitted time limit from the tier
    fn resolved(mut self, tier: &DifficultyTier) -> Self {
        if self.time_limit.is_none() {
            self.time_limit = Some(resolve(DEFAULT_TIME_LIMIT, tier, StatKey::TimeLimit));
        }
        self
    }
}

/// One level's settings for every tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDifficulty {
    pub level_index: u32,
    pub name: String,
    #[serde(default)]
    pub easy: LevelSettings,
    #[serde(default)]
    pub normal: LevelSettings,
    #[serde(default)]
    pub hard: LevelSettings,
}

impl LevelDifficulty {
    pub fn settings(&self, difficulty: Difficulty) -> &LevelSettings {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }
}

/// All configured levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelTable {
    pub levels: Vec<LevelDifficulty>,
}

impl LevelTable {
    pub fn from_ron(source: &str) -> Result<Self, CatalogError> {
        ron::from_str(source).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_ron(DEFAULT_LEVELS_RON)
    }

    /// Load an override file, or the embedded table when the file is absent
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Self::embedded();
        }
        let content = fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    pub fn find(&self, level_index: u32) -> Option<&LevelDifficulty> {
        self.levels.iter().find(|l| l.level_index == level_index)
    }

    /// Settings for a level at a tier, with the time limit resolved.
    ///
    /// Unconfigured levels get the defaults.
    pub fn settings(&self, level_index: u32, tier: &DifficultyTier) -> LevelSettings {
        let settings = match self.find(level_index) {
            Some(level) => level.settings(tier.id).clone(),
            None => {
                log::debug!("Level {} has no difficulty config, using defaults", level_index);
                LevelSettings::default()
            }
        };
        settings.resolved(tier)
    }
}
