//! Player entity creation

use hecs::{Entity, World};

use crate::ecs::{scale_entity, Hearts, Mobility, MoverKind, Name, Player, Scaled};
use crate::progression::DifficultyTier;

/// Designer values for the player character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerDef {
    pub max_hearts: i32,
    pub speed: f32,
    pub jump_force: f32,
}

/// Land player defaults
pub const LAND_PLAYER: PlayerDef = PlayerDef { max_hearts: 5, speed: 6.0, jump_force: 12.0 };

/// Swimmer in the underwater levels
pub const WATER_PLAYER: PlayerDef = PlayerDef { max_hearts: 5, speed: 4.0, jump_force: 0.0 };

/// Spawn the player, scaled for `tier`
pub fn spawn_player(world: &mut World, def: &PlayerDef, tier: &DifficultyTier) -> Entity {
    let entity = world.spawn((
        Player,
        Name::new("Player"),
        Hearts::new(def.max_hearts),
        Mobility::new(MoverKind::Player, def.speed, def.jump_force),
        Scaled,
    ));
    scale_entity(world, entity, tier);
    entity
}
