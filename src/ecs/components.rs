//! ECS Components
//!
//! Difficulty-sensitive components keep their designer base values next to
//! the scaled values they cache, so they can be re-scaled without the
//! template that spawned them.

use serde::{Deserialize, Serialize};

use crate::progression::{resolve, resolve_count, DifficultyScalable, DifficultyTier, StatKey};

// ============================================================================
// Identity & Markers
// ============================================================================

/// Name component for entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Marks an entity as the player
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Marks an entity as an enemy
#[derive(Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Marks an entity as a trap or falling hazard
#[derive(Debug, Clone, Copy, Default)]
pub struct Hazard;

/// Difficulty has been applied since spawn
#[derive(Debug, Clone, Copy, Default)]
pub struct Scaled;

/// Opt-in: re-scale this entity whenever the difficulty changes mid-level
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveDifficulty;

// ============================================================================
// Health
// ============================================================================

/// Player hearts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hearts {
    /// Designer max before scaling
    pub base_max: i32,
    pub max: i32,
    pub current: i32,
    /// Set once the spawn heart count has been applied
    started: bool,
}

impl Hearts {
    pub fn new(base_max: i32) -> Self {
        Self { base_max, max: base_max, current: base_max, started: false }
    }

    /// Returns the damage actually taken
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.current);
        self.current -= actual;
        actual
    }

    /// Returns the hearts actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.max - self.current);
        self.current += actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn percentage(&self) -> f32 {
        self.current as f32 / self.max as f32
    }
}

impl DifficultyScalable for Hearts {
    /// First application sets the spawn heart count; later ones only clamp
    fn apply_difficulty(&mut self, tier: &DifficultyTier) {
        self.max = resolve_count(self.base_max, tier, StatKey::PlayerHealth);
        if self.started {
            self.current = self.current.min(self.max);
        } else {
            self.current = resolve_count(self.base_max, tier, StatKey::SpawnHealth).min(self.max);
            self.started = true;
        }
    }
}

// ============================================================================
// Movement
// ============================================================================

/// Which stat keys scale a mover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoverKind {
    Player,
    Enemy,
}

/// Run speed and jump force
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mobility {
    pub kind: MoverKind,
    pub base_speed: f32,
    pub base_jump: f32,
    pub speed: f32,
    pub jump_force: f32,
}

impl Mobility {
    pub fn new(kind: MoverKind, speed: f32, jump_force: f32) -> Self {
        Self { kind, base_speed: speed, base_jump: jump_force, speed, jump_force }
    }

    fn keys(&self) -> (StatKey, StatKey) {
        match self.kind {
            MoverKind::Player => (StatKey::PlayerSpeed, StatKey::PlayerJump),
            MoverKind::Enemy => (StatKey::EnemySpeed, StatKey::EnemyJumpForce),
        }
    }
}

impl DifficultyScalable for Mobility {
    fn apply_difficulty(&mut self, tier: &DifficultyTier) {
        let (speed_key, jump_key) = self.keys();
        self.speed = resolve(self.base_speed, tier, speed_key);
        self.jump_force = resolve(self.base_jump, tier, jump_key);
    }
}

// ============================================================================
// Damage
// ============================================================================

/// Where contact damage comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    Enemy,
    Hazard,
}

impl DamageSource {
    pub fn stat(&self) -> StatKey {
        match self {
            DamageSource::Enemy => StatKey::EnemyDamage,
            DamageSource::Hazard => StatKey::HazardDamage,
        }
    }
}

/// Damage dealt to the player on touch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactDamage {
    pub source: DamageSource,
    pub base: i32,
    pub amount: i32,
    /// Upward impulse applied to the player on hit (traps bounce)
    pub knockback: f32,
}

impl ContactDamage {
    pub fn new(source: DamageSource, base: i32) -> Self {
        Self { source, base, amount: base, knockback: 0.0 }
    }

    pub fn with_knockback(mut self, knockback: f32) -> Self {
        self.knockback = knockback;
        self
    }
}

impl DifficultyScalable for ContactDamage {
    fn apply_difficulty(&mut self, tier: &DifficultyTier) {
        self.amount = resolve_count(self.base, tier, self.source.stat());
    }
}

/// A brick or rock that drops after a delay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingHazard {
    pub base_gravity: f32,
    pub base_drop_delay: f32,
    pub gravity_scale: f32,
    /// Seconds between trigger and drop
    pub drop_delay: f32,
}

impl FallingHazard {
    pub fn new(gravity_scale: f32, drop_delay: f32) -> Self {
        Self {
            base_gravity: gravity_scale,
            base_drop_delay: drop_delay,
            gravity_scale,
            drop_delay,
        }
    }
}

impl DifficultyScalable for FallingHazard {
    fn apply_difficulty(&mut self, tier: &DifficultyTier) {
        self.gravity_scale = resolve(self.base_gravity, tier, StatKey::HazardGravity);
        self.drop_delay = resolve(self.base_drop_delay, tier, StatKey::HazardDropDelay);
    }
}

// ============================================================================
// Pickups
// ============================================================================

/// Collectible categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Points,
    Health,
    Material,
    Gem,
    Sapling,
    Oxygen,
}

/// A collectible and what it grants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub base_points: i32,
    pub base_materials: i32,
    /// Hearts restored; not difficulty-scaled
    pub health_restore: i32,
    /// Seconds; 0 means the pickup is consumed for good
    pub base_respawn: f32,
    pub points: i32,
    pub materials: i32,
    pub respawn_time: f32,
}

impl Pickup {
    pub fn new(kind: PickupKind, points: i32, materials: i32) -> Self {
        Self {
            kind,
            base_points: points,
            base_materials: materials,
            health_restore: 0,
            base_respawn: 0.0,
            points,
            materials,
            respawn_time: 0.0,
        }
    }

    pub fn with_health(mut self, hearts: i32) -> Self {
        self.health_restore = hearts;
        self
    }

    pub fn with_respawn(mut self, seconds: f32) -> Self {
        self.base_respawn = seconds;
        self.respawn_time = seconds;
        self
    }

    pub fn respawns(&self) -> bool {
        self.respawn_time > 0.0
    }
}

impl DifficultyScalable for Pickup {
    fn apply_difficulty(&mut self, tier: &DifficultyTier) {
        self.points = resolve_count(self.base_points, tier, StatKey::PointsValue);
        self.materials = resolve_count(self.base_materials, tier, StatKey::ResourceDrop);
        self.respawn_time = resolve(self.base_respawn, tier, StatKey::RespawnTime);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{Difficulty, DifficultyCatalog};

    #[test]
    fn test_hearts_spawn_then_clamp() {
        let catalog = DifficultyCatalog::embedded().unwrap();
        let mut hearts = Hearts::new(5);

        hearts.apply_difficulty(catalog.get(Difficulty::Easy));
        assert_eq!(hearts.max, 8);
        assert_eq!(hearts.current, 4);

        hearts.heal(10);
        assert_eq!(hearts.current, 8);

        // Later switches keep current hearts, clamped to the new max
        hearts.apply_difficulty(catalog.get(Difficulty::Hard));
        assert_eq!(hearts.max, 4);
        assert_eq!(hearts.current, 4);
    }

    #[test]
    fn test_hearts_damage() {
        let mut hearts = Hearts::new(3);
        assert_eq!(hearts.take_damage(2), 2);
        assert_eq!(hearts.take_damage(5), 1);
        assert_eq!(hearts.take_damage(-1), 0);
        assert!(hearts.is_dead());
    }

    #[test]
    fn test_damage_source_keys() {
        let catalog = DifficultyCatalog::embedded().unwrap();
        let hard = catalog.get(Difficulty::Hard);

        let mut bite = ContactDamage::new(DamageSource::Enemy, 2);
        bite.apply_difficulty(hard);
        assert_eq!(bite.amount, 3);

        let mut spikes = ContactDamage::new(DamageSource::Hazard, 1);
        spikes.apply_difficulty(catalog.get(Difficulty::Easy));
        assert_eq!(spikes.amount, 1);
    }

    #[test]
    fn test_pickup_without_points_stays_empty() {
        let catalog = DifficultyCatalog::embedded().unwrap();
        let mut heart = Pickup::new(PickupKind::Health, 0, 0).with_health(1);
        heart.apply_difficulty(catalog.get(Difficulty::Hard));
        assert_eq!(heart.points, 0);
        assert_eq!(heart.materials, 0);
        assert_eq!(heart.health_restore, 1);
        assert!(!heart.respawns());
    }
}
