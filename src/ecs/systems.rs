//! ECS Systems
//!
//! Difficulty application and the contact/pickup rules that read scaled
//! values.

use std::sync::Arc;

use hecs::{Component, Entity, World};
use parking_lot::Mutex;

use crate::ecs::{ContactDamage, FallingHazard, Hearts, LiveDifficulty, Mobility, Pickup, Scaled};
use crate::progression::{Difficulty, DifficultyRegistry, DifficultyScalable, DifficultyTier, SubscriptionId};

fn scale_component<T>(world: &World, entity: Entity, tier: &DifficultyTier) -> bool
where
    T: Component + DifficultyScalable,
{
    match world.get::<&mut T>(entity) {
        Ok(mut component) => {
            component.apply_difficulty(tier);
            true
        }
        Err(_) => false,
    }
}

/// Apply a tier to every scalable component on one entity.
/// Returns how many components were scaled.
pub fn scale_entity(world: &World, entity: Entity, tier: &DifficultyTier) -> usize {
    [
        scale_component::<Hearts>(world, entity, tier),
        scale_component::<Mobility>(world, entity, tier),
        scale_component::<ContactDamage>(world, entity, tier),
        scale_component::<FallingHazard>(world, entity, tier),
        scale_component::<Pickup>(world, entity, tier),
    ]
    .into_iter()
    .filter(|scaled| *scaled)
    .count()
}

/// Scale every entity spawned since the last call and tag it [`Scaled`].
/// Run once per frame after spawning. Returns the number of entities scaled.
pub fn scale_spawned(world: &mut World, tier: &DifficultyTier) -> usize {
    let fresh: Vec<Entity> = world
        .iter()
        .filter(|entity| !entity.has::<Scaled>())
        .map(|entity| entity.entity())
        .collect();

    for &entity in &fresh {
        let components = scale_entity(world, entity, tier);
        log::debug!("Scaled {} components on {:?} for {}", components, entity, tier.id);
        let _ = world.insert_one(entity, Scaled);
    }

    fresh.len()
}

/// Re-scale entities that opted into [`LiveDifficulty`]. Everything else
/// keeps its spawn-time values until the next level load.
pub fn rescale_live(world: &World, tier: &DifficultyTier) -> usize {
    let live: Vec<Entity> = world
        .query::<&LiveDifficulty>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    for &entity in &live {
        scale_entity(world, entity, tier);
    }

    if !live.is_empty() {
        log::info!("Re-scaled {} live entities for {}", live.len(), tier.id);
    }
    live.len()
}

/// Bridges registry notifications into the frame loop: a switch is recorded
/// when it happens and applied to live entities on the next [`sync`].
///
/// [`sync`]: DifficultyWatcher::sync
pub struct DifficultyWatcher {
    registry: DifficultyRegistry,
    pending: Arc<Mutex<Option<Difficulty>>>,
    subscription: SubscriptionId,
}

impl DifficultyWatcher {
    pub fn new(registry: &DifficultyRegistry) -> Self {
        let pending = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&pending);
        let subscription = registry.subscribe(move |difficulty| {
            *slot.lock() = Some(difficulty);
        });

        Self {
            registry: registry.clone(),
            pending,
            subscription,
        }
    }

    /// A switch is waiting to be applied
    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Apply the latest pending switch, if any, to live entities
    pub fn sync(&self, world: &World) -> Option<Difficulty> {
        let difficulty = self.pending.lock().take()?;
        rescale_live(world, self.registry.catalog().get(difficulty));
        Some(difficulty)
    }
}

impl Drop for DifficultyWatcher {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.subscription);
    }
}

// ============================================================================
// Contact & Pickups
// ============================================================================

/// Outcome of the player touching a damage source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactResult {
    pub damage: i32,
    pub knockback: f32,
    pub died: bool,
}

/// Apply a source's scaled contact damage to the player.
/// `None` if either entity lacks the needed component.
pub fn apply_contact_damage(world: &World, player: Entity, source: Entity) -> Option<ContactResult> {
    let contact = *world.get::<&ContactDamage>(source).ok()?;
    let mut hearts = world.get::<&mut Hearts>(player).ok()?;

    let damage = hearts.take_damage(contact.amount);
    let died = hearts.is_dead();
    if died {
        log::info!("Player died to {:?} contact", contact.source);
    }

    Some(ContactResult { damage, knockback: contact.knockback, died })
}

/// What collecting a pickup granted
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PickupReward {
    pub points: i32,
    pub materials: i32,
    pub healed: i32,
    /// Seconds until it reappears, if it does
    pub respawn_in: Option<f32>,
}

/// Collect a pickup. Consumed pickups are despawned; respawning ones are left
/// for the caller to hide and restore after `respawn_in`.
pub fn collect_pickup(world: &mut World, player: Entity, pickup: Entity) -> Option<PickupReward> {
    let item = *world.get::<&Pickup>(pickup).ok()?;

    let healed = match world.get::<&mut Hearts>(player) {
        Ok(mut hearts) if item.health_restore > 0 => hearts.heal(item.health_restore),
        _ => 0,
    };

    let respawn_in = item.respawns().then_some(item.respawn_time);
    if respawn_in.is_none() {
        let _ = world.despawn(pickup);
    }

    Some(PickupReward {
        points: item.points,
        materials: item.materials,
        healed,
        respawn_in,
    })
}
