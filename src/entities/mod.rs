//! Entity creation
//!
//! Each spawn helper resolves its difficulty-sensitive stats against the
//! tier it is given and caches them on the new entity.

pub mod player;
pub mod enemies;
pub mod hazards;
pub mod pickups;

pub use player::{spawn_player, PlayerDef, LAND_PLAYER, WATER_PLAYER};
pub use enemies::{enemy_def, spawn_enemy, spawn_live_enemy, EnemyDef, ALL_ENEMIES, BOAR, FROG, PIRANHA, SLIME};
pub use hazards::{spawn_hazard, HazardDef, FALLING_BRICK, SPIKE_TRAP, THORN_BUSH};
pub use pickups::{spawn_pickup, PickupDef, AIR_BUBBLE, COIN, GEM, HEART, LOG, SAPLING};
