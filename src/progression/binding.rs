//! Per-entity stat bindings
//!
//! A binding caches one base stat resolved against a tier. Plain bindings are
//! resolved at spawn and stay as they are until refreshed, so an entity that
//! outlives a difficulty switch keeps its old values until the next level
//! load. [`LiveBinding`] opts into re-resolving on every switch.

use std::sync::Arc;

use parking_lot::Mutex;

use super::difficulty::{Difficulty, DifficultyTier, StatKey};
use super::registry::{DifficultyRegistry, SubscriptionId};
use super::resolver;

/// Anything with difficulty-sensitive stats
pub trait DifficultyScalable {
    /// Recompute cached stats from designer bases for `tier`
    fn apply_difficulty(&mut self, tier: &DifficultyTier);
}

/// A base value and its cached resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatBinding {
    key: StatKey,
    base: f32,
    adjusted: f32,
    tier: Difficulty,
}

impl StatBinding {
    pub fn new(key: StatKey, base: f32, tier: &DifficultyTier) -> Self {
        Self {
            key,
            base,
            adjusted: resolver::resolve(base, tier, key),
            tier: tier.id,
        }
    }

    /// Resolve against the registry's current tier
    pub fn bind(key: StatKey, base: f32, registry: &DifficultyRegistry) -> Self {
        Self::new(key, base, registry.current_tier())
    }

    pub fn value(&self) -> f32 {
        self.adjusted
    }

    /// Value as an integer, for count and fixed stats
    pub fn count(&self) -> i32 {
        self.adjusted.round() as i32
    }

    pub fn base(&self) -> f32 {
        self.base
    }

    pub fn key(&self) -> StatKey {
        self.key
    }

    /// Tier the cached value was resolved against
    pub fn tier(&self) -> Difficulty {
        self.tier
    }

    /// False when the registry has moved on since this was resolved
    pub fn is_current(&self, registry: &DifficultyRegistry) -> bool {
        self.tier == registry.current_tier_id()
    }
}

impl DifficultyScalable for StatBinding {
    fn apply_difficulty(&mut self, tier: &DifficultyTier) {
        self.adjusted = resolver::resolve(self.base, tier, self.key);
        self.tier = tier.id;
    }
}

/// A binding that follows the registry. Unsubscribes when dropped.
pub struct LiveBinding {
    binding: Arc<Mutex<StatBinding>>,
    registry: DifficultyRegistry,
    subscription: SubscriptionId,
}

impl LiveBinding {
    pub fn bind(key: StatKey, base: f32, registry: &DifficultyRegistry) -> Self {
        let binding = Arc::new(Mutex::new(StatBinding::bind(key, base, registry)));

        // Capture the catalog, not the registry, so the listener holds no
        // reference back to its owner
        let catalog = registry.catalog().clone();
        let shared = Arc::clone(&binding);
        let subscription = registry.subscribe(move |id| {
            shared.lock().apply_difficulty(catalog.get(id));
        });

        Self {
            binding,
            registry: registry.clone(),
            subscription,
        }
    }

    pub fn value(&self) -> f32 {
        self.binding.lock().value()
    }

    pub fn count(&self) -> i32 {
        self.binding.lock().count()
    }

    pub fn snapshot(&self) -> StatBinding {
        *self.binding.lock()
    }
}

impl Drop for LiveBinding {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.subscription);
    }
}

impl std::fmt::Debug for LiveBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveBinding")
            .field("binding", &self.snapshot())
            .field("subscription", &self.subscription)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::DifficultyCatalog;
    use crate::save::MemoryStore;

    fn registry() -> DifficultyRegistry {
        DifficultyRegistry::new(DifficultyCatalog::embedded().unwrap(), MemoryStore::new())
    }

    #[test]
    fn test_plain_binding_stays_stale() {
        let registry = registry();
        let damage = StatBinding::bind(StatKey::EnemyDamage, 10.0, &registry);
        assert_eq!(damage.count(), 10);

        registry.set_difficulty(Difficulty::Hard);
        assert_eq!(damage.count(), 10);
        assert!(!damage.is_current(&registry));

        let mut refreshed = damage;
        refreshed.apply_difficulty(registry.current_tier());
        assert_eq!(refreshed.count(), 15);
        assert!(refreshed.is_current(&registry));
        assert_eq!(refreshed.base(), 10.0);
    }

    #[test]
    fn test_live_binding_follows_switches() {
        let registry = registry();
        let health = LiveBinding::bind(StatKey::PlayerHealth, 5.0, &registry);
        assert_eq!(health.count(), 5);

        registry.set_difficulty(Difficulty::Easy);
        assert_eq!(health.count(), 8);

        registry.set_difficulty(Difficulty::Hard);
        assert_eq!(health.count(), 4);
        assert_eq!(health.snapshot().tier(), Difficulty::Hard);
    }

    #[test]
    fn test_dropping_live_binding_unsubscribes() {
        let registry = registry();
        let speed = LiveBinding::bind(StatKey::EnemySpeed, 5.0, &registry);
        assert_eq!(registry.subscriber_count(), 1);
        drop(speed);
        assert_eq!(registry.subscriber_count(), 0);
    }
}
