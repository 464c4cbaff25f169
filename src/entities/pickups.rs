//! Pickup entity creation

use hecs::{Entity, World};

use crate::ecs::{scale_entity, Name, Pickup, PickupKind, Scaled};
use crate::progression::DifficultyTier;

/// Pickup definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupDef {
    pub name: &'static str,
    pub kind: PickupKind,
    pub points: i32,
    pub materials: i32,
    pub health_restore: i32,
    /// Seconds; 0 for single-use pickups
    pub respawn_time: f32,
}

pub const COIN: PickupDef = PickupDef { name: "Coin", kind: PickupKind::Points, points: 1, materials: 0, health_restore: 0, respawn_time: 0.0 };

pub const GEM: PickupDef = PickupDef { name: "Gem", kind: PickupKind::Gem, points: 5, materials: 0, health_restore: 0, respawn_time: 0.0 };

pub const LOG: PickupDef = PickupDef { name: "Log", kind: PickupKind::Material, points: 0, materials: 1, health_restore: 0, respawn_time: 8.0 };

pub const SAPLING: PickupDef = PickupDef { name: "Sapling", kind: PickupKind::Sapling, points: 2, materials: 1, health_restore: 0, respawn_time: 0.0 };

pub const HEART: PickupDef = PickupDef { name: "Heart", kind: PickupKind::Health, points: 0, materials: 0, health_restore: 1, respawn_time: 0.0 };

pub const AIR_BUBBLE: PickupDef = PickupDef { name: "Air Bubble", kind: PickupKind::Oxygen, points: 0, materials: 0, health_restore: 0, respawn_time: 5.0 };

/// Spawn a pickup scaled for `tier`
pub fn spawn_pickup(world: &mut World, def: &PickupDef, tier: &DifficultyTier) -> Entity {
    let pickup = Pickup::new(def.kind, def.points, def.materials)
        .with_health(def.health_restore)
        .with_respawn(def.respawn_time);
    let entity = world.spawn((Name::new(def.name), pickup, Scaled));
    scale_entity(world, entity, tier);
    entity
}
