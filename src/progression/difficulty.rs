//! Difficulty tiers and the stat keys they scale
//!
//! A tier is a named level plus one value for every [`StatKey`]. Tiers are
//! built by the catalog and never change afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DifficultyError;

/// Game difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Every tier, easiest first
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Position in [`Difficulty::ALL`]
    pub(crate) fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DifficultyError::InvalidTier(s.to_string()))
    }
}

/// How a stat's tier value combines with a designer base value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    /// Real-valued multiplier (speeds, timings)
    Rate,
    /// Multiplier on an integer quantity (health, damage, points)
    Count,
    /// The tier value is the quantity itself
    Fixed,
}

/// Every difficulty-sensitive quantity a gameplay entity can read
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatKey {
    /// Player max hearts
    PlayerHealth,
    /// Hearts the player starts a level with
    SpawnHealth,
    PlayerSpeed,
    PlayerJump,
    EnemySpeed,
    EnemyJumpForce,
    /// Contact damage dealt by enemies
    EnemyDamage,
    /// Damage dealt by traps and falling bricks
    HazardDamage,
    HazardGravity,
    HazardDropDelay,
    PointsValue,
    /// Materials and saplings granted by pickups
    ResourceDrop,
    RespawnTime,
    TimeLimit,
}

impl StatKey {
    pub const ALL: [StatKey; 14] = [
        StatKey::PlayerHealth,
        StatKey::SpawnHealth,
        StatKey::PlayerSpeed,
        StatKey::PlayerJump,
        StatKey::EnemySpeed,
        StatKey::EnemyJumpForce,
        StatKey::EnemyDamage,
        StatKey::HazardDamage,
        StatKey::HazardGravity,
        StatKey::HazardDropDelay,
        StatKey::PointsValue,
        StatKey::ResourceDrop,
        StatKey::RespawnTime,
        StatKey::TimeLimit,
    ];

    pub fn kind(&self) -> StatKind {
        match self {
            StatKey::PlayerHealth
            | StatKey::EnemyDamage
            | StatKey::HazardDamage
            | StatKey::PointsValue
            | StatKey::ResourceDrop => StatKind::Count,
            StatKey::SpawnHealth => StatKind::Fixed,
            StatKey::PlayerSpeed
            | StatKey::PlayerJump
            | StatKey::EnemySpeed
            | StatKey::EnemyJumpForce
            | StatKey::HazardGravity
            | StatKey::HazardDropDelay
            | StatKey::RespawnTime
            | StatKey::TimeLimit => StatKind::Rate,
        }
    }
}

/// One difficulty level with a value for every stat key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    pub id: Difficulty,
    pub stats: BTreeMap<StatKey, f32>,
}

impl DifficultyTier {
    /// Tier value for a stat.
    ///
    /// Catalog validation guarantees every key is present, so the neutral
    /// fallback is only reachable for tiers built by hand outside a catalog.
    pub fn value(&self, key: StatKey) -> f32 {
        match self.stats.get(&key) {
            Some(v) => *v,
            None => {
                log::error!("Tier {} has no value for {:?}; using 1.0", self.id, key);
                1.0
            }
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }
}
