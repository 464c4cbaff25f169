//! Hazard entity creation
//!
//! Spike traps bounce and hurt the player; bricks drop after a delay.

use hecs::{Entity, World};

use crate::ecs::{scale_entity, ContactDamage, DamageSource, FallingHazard, Hazard, Name, Scaled};
use crate::progression::DifficultyTier;

/// Hazard definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardDef {
    pub name: &'static str,
    pub damage: i32,
    pub bounce_force: f32,
    /// Gravity scale and drop delay for hazards that fall
    pub falling: Option<(f32, f32)>,
}

pub const SPIKE_TRAP: HazardDef = HazardDef { name: "Spike Trap", damage: 1, bounce_force: 10.0, falling: None };

pub const FALLING_BRICK: HazardDef = HazardDef { name: "Falling Brick", damage: 1, bounce_force: 0.0, falling: Some((5.0, 0.5)) };

pub const THORN_BUSH: HazardDef = HazardDef { name: "Thorn Bush", damage: 2, bounce_force: 4.0, falling: None };

/// Spawn a hazard scaled for `tier`
pub fn spawn_hazard(world: &mut World, def: &HazardDef, tier: &DifficultyTier) -> Entity {
    let entity = world.spawn((
        Hazard,
        Name::new(def.name),
        ContactDamage::new(DamageSource::Hazard, def.damage).with_knockback(def.bounce_force),
        Scaled,
    ));
    if let Some((gravity, delay)) = def.falling {
        let _ = world.insert_one(entity, FallingHazard::new(gravity, delay));
    }
    scale_entity(world, entity, tier);
    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{Difficulty, DifficultyCatalog};

    #[test]
    fn test_brick_falls_faster_on_hard() {
        let catalog = DifficultyCatalog::embedded().unwrap();
        let mut world = World::new();
        let normal = spawn_hazard(&mut world, &FALLING_BRICK, catalog.get(Difficulty::Normal));
        let hard = spawn_hazard(&mut world, &FALLING_BRICK, catalog.get(Difficulty::Hard));

        let normal = *world.get::<&FallingHazard>(normal).unwrap();
        let hard = *world.get::<&FallingHazard>(hard).unwrap();
        assert!(hard.gravity_scale > normal.gravity_scale);
        assert!(hard.drop_delay < normal.drop_delay);
    }

    #[test]
    fn test_trap_damage_floor() {
        let catalog = DifficultyCatalog::embedded().unwrap();
        let mut world = World::new();
        let trap = spawn_hazard(&mut world, &SPIKE_TRAP, catalog.get(Difficulty::Easy));
        let contact = *world.get::<&ContactDamage>(trap).unwrap();
        assert_eq!(contact.amount, 1);
        assert_eq!(contact.knockback, 10.0);
        assert!(world.get::<&FallingHazard>(trap).is_err());
    }
}
