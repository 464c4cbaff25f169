//! Player progression record
//!
//! The selected difficulty lives in the same JSON record as points and level
//! progress, so difficulty writes must leave the other fields alone.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::progression::Difficulty;

/// Current record version for compatibility
pub const PROGRESSION_VERSION: u32 = 1;

/// Number of level slots tracked in the record
pub const LEVEL_SLOTS: usize = 10;

/// Persistent player progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressionData {
    pub version: u32,
    /// Raw tier name; unrecognized values are tolerated and resolve to Normal
    pub selected_difficulty: String,
    pub total_points: i64,
    pub highest_level_unlocked: u32,
    /// Seconds
    pub total_play_time: f32,
    pub total_deaths: u32,
    pub total_enemies_killed: u32,
    pub total_items_collected: u32,
    pub level_stats: Vec<LevelStats>,
    /// Fields written by other tools or newer builds, kept on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-level statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelStats {
    pub level_index: u32,
    pub best_score: i64,
    /// Seconds, 0 when never completed
    pub best_time: f32,
    pub completed: bool,
    pub times_played: u32,
    pub deaths: u32,
}

impl Default for ProgressionData {
    fn default() -> Self {
        Self {
            version: PROGRESSION_VERSION,
            selected_difficulty: Difficulty::Normal.name().to_string(),
            total_points: 0,
            highest_level_unlocked: 0,
            total_play_time: 0.0,
            total_deaths: 0,
            total_enemies_killed: 0,
            total_items_collected: 0,
            level_stats: (0..LEVEL_SLOTS as u32)
                .map(|level_index| LevelStats { level_index, ..LevelStats::default() })
                .collect(),
            extra: Map::new(),
        }
    }
}

impl ProgressionData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.selected_difficulty = difficulty.name().to_string();
    }

    pub fn add_points(&mut self, points: i64) {
        self.total_points += points;
    }

    /// Unlock a level. Returns true if this raised the highest unlocked level.
    pub fn unlock_level(&mut self, level_index: u32) -> bool {
        if level_index > self.highest_level_unlocked {
            self.highest_level_unlocked = level_index;
            true
        } else {
            false
        }
    }

    pub fn is_level_unlocked(&self, level_index: u32) -> bool {
        level_index <= self.highest_level_unlocked
    }

    /// Record a finished level. Indices past the tracked slots are ignored.
    pub fn record_level_score(&mut self, level_index: u32, score: i64) {
        let Some(stats) = self.level_stats.get_mut(level_index as usize) else {
            log::warn!("Level {} is outside the {} tracked slots", level_index, LEVEL_SLOTS);
            return;
        };

        stats.level_index = level_index;
        if score > stats.best_score {
            stats.best_score = score;
        }
        stats.completed = true;
        stats.times_played += 1;
    }

    pub fn record_death(&mut self, level_index: u32) {
        self.total_deaths += 1;
        if let Some(stats) = self.level_stats.get_mut(level_index as usize) {
            stats.deaths += 1;
        }
    }
}
