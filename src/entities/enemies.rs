//! Enemy entity creation
//!
//! Walkers, jumpers and chasers. Speed, jump force and contact damage all
//! scale with difficulty.

use hecs::{Entity, World};

use crate::ecs::{scale_entity, ContactDamage, DamageSource, Enemy, LiveDifficulty, Mobility, MoverKind, Name, Scaled};
use crate::progression::DifficultyTier;

/// Enemy definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyDef {
    pub name: &'static str,
    pub speed: f32,
    pub jump_force: f32,
    pub damage: i32,
}

pub const SLIME: EnemyDef = EnemyDef { name: "Slime", speed: 2.0, jump_force: 0.0, damage: 1 };

pub const FROG: EnemyDef = EnemyDef { name: "Frog", speed: 1.5, jump_force: 8.0, damage: 1 };

pub const BOAR: EnemyDef = EnemyDef { name: "Boar", speed: 5.0, jump_force: 0.0, damage: 2 };

pub const PIRANHA: EnemyDef = EnemyDef { name: "Piranha", speed: 3.5, jump_force: 0.0, damage: 1 };

/// Every enemy definition
pub static ALL_ENEMIES: [EnemyDef; 4] = [SLIME, FROG, BOAR, PIRANHA];

/// Find a definition by name
pub fn enemy_def(name: &str) -> Option<&'static EnemyDef> {
    ALL_ENEMIES.iter().find(|d| d.name.eq_ignore_ascii_case(name))
}

/// Spawn an enemy scaled for `tier`
pub fn spawn_enemy(world: &mut World, def: &EnemyDef, tier: &DifficultyTier) -> Entity {
    let entity = world.spawn((
        Enemy,
        Name::new(def.name),
        Mobility::new(MoverKind::Enemy, def.speed, def.jump_force),
        ContactDamage::new(DamageSource::Enemy, def.damage),
        Scaled,
    ));
    scale_entity(world, entity, tier);
    log::debug!("Spawned {} for {}", def.name, tier.id);
    entity
}

/// Spawn an enemy that keeps following difficulty switches while alive
pub fn spawn_live_enemy(world: &mut World, def: &EnemyDef, tier: &DifficultyTier) -> Entity {
    let entity = spawn_enemy(world, def, tier);
    let _ = world.insert_one(entity, LiveDifficulty);
    entity
}
