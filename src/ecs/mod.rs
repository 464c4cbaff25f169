//! Entity Component System module
//!
//! Difficulty-sensitive components and the systems that scale them.

pub mod components;
pub mod systems;

pub use components::*;
pub use systems::{
    apply_contact_damage, collect_pickup, rescale_live, scale_entity, scale_spawned,
    ContactResult, DifficultyWatcher, PickupReward,
};
