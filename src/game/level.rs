//! Level lifecycle
//!
//! A level reads the selected tier once when it loads. Entities spawned from
//! then on pick up whatever tier is current at spawn; entities already in the
//! world only change if they opted into live difficulty.

use hecs::{Entity, World};

use crate::ecs::{scale_spawned, DifficultyWatcher};
use crate::entities::{
    spawn_enemy, spawn_hazard, spawn_pickup, spawn_player, ALL_ENEMIES, COIN, FALLING_BRICK, HEART,
    LAND_PLAYER, SPIKE_TRAP,
};
use crate::progression::{Difficulty, DifficultyRegistry, LevelSettings, LevelTable};

/// A loaded level and its entities
pub struct Level {
    pub index: u32,
    /// Tier the level was loaded at
    pub difficulty: Difficulty,
    pub settings: LevelSettings,
    pub world: World,
    pub player: Entity,
    registry: DifficultyRegistry,
    watcher: DifficultyWatcher,
}

impl Level {
    /// Load a level with its per-tier spawn counts
    pub fn load(registry: &DifficultyRegistry, table: &LevelTable, index: u32) -> Self {
        let tier = registry.current_tier();
        let settings = table.settings(index, tier);
        let mut world = World::new();

        let player = spawn_player(&mut world, &LAND_PLAYER, tier);

        for i in 0..settings.enemy_count as usize {
            spawn_enemy(&mut world, &ALL_ENEMIES[i % ALL_ENEMIES.len()], tier);
        }
        for i in 0..settings.hazard_count {
            let def = if i % 2 == 0 { &SPIKE_TRAP } else { &FALLING_BRICK };
            spawn_hazard(&mut world, def, tier);
        }
        for _ in 0..settings.health_pickup_count {
            spawn_pickup(&mut world, &HEART, tier);
        }
        for _ in 0..settings.point_pickup_count {
            spawn_pickup(&mut world, &COIN, tier);
        }

        log::info!(
            "Loaded level {} at {}: {} enemies, {} hazards, goal {}",
            index, tier.id, settings.enemy_count, settings.hazard_count, settings.score_goal
        );

        Self {
            index,
            difficulty: tier.id,
            settings,
            world,
            player,
            registry: registry.clone(),
            watcher: DifficultyWatcher::new(registry),
        }
    }

    /// Per-frame difficulty upkeep: apply a pending switch to live entities,
    /// then scale anything spawned since the last frame
    pub fn update(&mut self) {
        if let Some(difficulty) = self.watcher.sync(&self.world) {
            log::debug!("Level {} saw a switch to {}", self.index, difficulty);
        }
        scale_spawned(&mut self.world, self.registry.current_tier());
    }

    /// Reload at the current tier, as after a restart or respawn
    pub fn reload(&self, table: &LevelTable) -> Self {
        Self::load(&self.registry, table, self.index)
    }
}
