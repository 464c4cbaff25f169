//! Difficulty registry
//!
//! The single authority for the selected tier. Handles are cheap clones of
//! one shared state; [`bootstrap`] and [`global`] expose the session's one
//! instance to code that cannot have it passed in.
//!
//! `set_difficulty` updates memory, persists, then notifies listeners in
//! registration order before returning. No lock is held while a listener
//! runs, so listeners may read or modify the registry. A `set_difficulty`
//! made from inside a listener is queued and delivered after the pass in
//! progress, so the last tier every listener receives is the current one.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use super::catalog::DifficultyCatalog;
use super::difficulty::{Difficulty, DifficultyTier, StatKey};
use super::resolver;
use crate::error::{DifficultyError, PersistenceError};
use crate::save::{DifficultyStore, ProfileStore};

type Listener = Arc<dyn Fn(Difficulty) + Send + Sync>;

/// Handle returned by [`DifficultyRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct RegistryState {
    current: Difficulty,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    /// False once a write has failed; cleared by the next successful write
    durable: bool,
    /// Selections waiting to be delivered to listeners
    pending: VecDeque<Difficulty>,
    /// A notification pass is running
    notifying: bool,
}

struct Inner {
    catalog: DifficultyCatalog,
    state: Mutex<RegistryState>,
    store: Mutex<Box<dyn DifficultyStore>>,
}

/// Shared handle to the selected difficulty
#[derive(Clone)]
pub struct DifficultyRegistry {
    inner: Arc<Inner>,
}

impl DifficultyRegistry {
    /// Build a registry and read the persisted selection once
    pub fn new(catalog: DifficultyCatalog, store: impl DifficultyStore + 'static) -> Self {
        let registry = Self {
            inner: Arc::new(Inner {
                catalog,
                state: Mutex::new(RegistryState {
                    current: Difficulty::Normal,
                    listeners: Vec::new(),
                    next_id: 0,
                    durable: true,
                    pending: VecDeque::new(),
                    notifying: false,
                }),
                store: Mutex::new(Box::new(store)),
            }),
        };

        let loaded = registry.load_persisted();
        registry.inner.state.lock().current = loaded;
        log::info!("Difficulty registry ready at {}", loaded);
        registry
    }

    /// Read the last saved selection, falling back to Normal
    pub fn load_persisted(&self) -> Difficulty {
        let raw = self.inner.store.lock().load_difficulty();
        match raw {
            Ok(Some(name)) => match name.parse::<Difficulty>() {
                Ok(difficulty) => difficulty,
                Err(_) => {
                    log::warn!("Saved difficulty {:?} is not a known tier, using Normal", name);
                    Difficulty::Normal
                }
            },
            Ok(None) => {
                log::info!("No saved difficulty, using Normal");
                Difficulty::Normal
            }
            Err(e) => {
                log::warn!("Could not read saved difficulty ({}), using Normal", e);
                Difficulty::Normal
            }
        }
    }

    pub fn current_tier_id(&self) -> Difficulty {
        self.inner.state.lock().current
    }

    pub fn current_tier(&self) -> &DifficultyTier {
        self.inner.catalog.get(self.current_tier_id())
    }

    pub fn catalog(&self) -> &DifficultyCatalog {
        &self.inner.catalog
    }

    /// Current tier's value for a stat
    pub fn multiplier(&self, key: StatKey) -> f32 {
        self.current_tier().value(key)
    }

    /// Resolve a base value against the current tier
    pub fn resolve(&self, base: f32, key: StatKey) -> f32 {
        resolver::resolve(base, self.current_tier(), key)
    }

    /// Whether the last write reached the store. When false the selection is
    /// held in memory only for this session.
    pub fn is_durable(&self) -> bool {
        self.inner.state.lock().durable
    }

    /// Select a tier, persist it and notify every listener.
    ///
    /// Each call notifies each listener exactly once, even when the tier does
    /// not change. A failed write is logged and leaves the new selection in
    /// place. Called from a listener, the notification is queued behind the
    /// pass in progress and this returns without waiting for it.
    pub fn set_difficulty(&self, difficulty: Difficulty) {
        let previous = {
            let mut state = self.inner.state.lock();
            std::mem::replace(&mut state.current, difficulty)
        };
        log::info!("Difficulty set to {} (was {})", difficulty, previous);

        let durable = match self.persist(difficulty) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save difficulty {}: {}; keeping it for this session only", difficulty, e);
                false
            }
        };

        {
            let mut state = self.inner.state.lock();
            state.durable = durable;
            state.pending.push_back(difficulty);
            if state.notifying {
                return;
            }
            state.notifying = true;
        }

        let _pass = NotifyPass(&*self.inner);
        while let Some((next, listeners)) = self.next_delivery() {
            for listener in listeners {
                listener(next);
            }
        }
    }

    /// Pop the next queued selection with a snapshot of the listeners
    fn next_delivery(&self) -> Option<(Difficulty, Vec<Listener>)> {
        let mut state = self.inner.state.lock();
        let next = state.pending.pop_front()?;
        let listeners = state.listeners.iter().map(|(_, listener)| Arc::clone(listener)).collect();
        Some((next, listeners))
    }

    /// Select a tier by name, as sent by a UI panel.
    ///
    /// Unknown names are rejected and leave the selection untouched.
    pub fn select(&self, name: &str) -> Result<Difficulty, DifficultyError> {
        let difficulty = name.parse::<Difficulty>().map_err(|e| {
            log::warn!("Rejected difficulty selection {:?}", name);
            e
        })?;
        self.set_difficulty(difficulty);
        Ok(difficulty)
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Difficulty) + Send + Sync + 'static,
    {
        let mut state = self.inner.state.lock();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.inner.state.lock();
        let before = state.listeners.len();
        state.listeners.retain(|(sid, _)| *sid != id);
        state.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().listeners.len()
    }

    /// Write the current selection, at shutdown
    pub fn flush(&self) -> Result<(), PersistenceError> {
        let current = self.current_tier_id();
        let result = self.persist(current);
        self.inner.state.lock().durable = result.is_ok();
        result
    }

    /// Whether two handles share one underlying registry
    pub fn same_instance(a: &DifficultyRegistry, b: &DifficultyRegistry) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    fn persist(&self, difficulty: Difficulty) -> Result<(), PersistenceError> {
        self.inner.store.lock().save_difficulty(difficulty)
    }
}

/// Ends a notification pass, even if a listener panics
struct NotifyPass<'a>(&'a Inner);

impl Drop for NotifyPass<'_> {
    fn drop(&mut self) {
        let mut state = self.0.state.lock();
        state.notifying = false;
        state.pending.clear();
    }
}

impl fmt::Debug for DifficultyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("DifficultyRegistry")
            .field("current", &state.current)
            .field("subscribers", &state.listeners.len())
            .field("durable", &state.durable)
            .finish()
    }
}

// =============================================================================
// Session-wide access point
// =============================================================================

static GLOBAL: OnceLock<DifficultyRegistry> = OnceLock::new();

/// Install the session registry. Only the first call builds one; later calls
/// return the installed instance and drop their arguments.
pub fn bootstrap(
    catalog: DifficultyCatalog,
    store: impl DifficultyStore + 'static,
) -> &'static DifficultyRegistry {
    let mut installed = false;
    let registry = GLOBAL.get_or_init(|| {
        installed = true;
        DifficultyRegistry::new(catalog, store)
    });
    if !installed {
        log::warn!("Difficulty registry already bootstrapped; ignoring the new catalog and store");
    }
    registry
}

/// The session registry, bootstrapped on first access from the embedded
/// catalog and the on-disk profile
pub fn global() -> Result<&'static DifficultyRegistry, DifficultyError> {
    if let Some(registry) = GLOBAL.get() {
        return Ok(registry);
    }
    let catalog = DifficultyCatalog::embedded()?;
    Ok(bootstrap(catalog, ProfileStore::new()))
}

/// Whether the session registry has been installed
pub fn is_ready() -> bool {
    GLOBAL.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn catalog() -> DifficultyCatalog {
        DifficultyCatalog::embedded().unwrap()
    }

    #[test]
    fn test_empty_store_starts_on_normal() {
        let registry = DifficultyRegistry::new(catalog(), MemoryStore::new());
        assert_eq!(registry.current_tier_id(), Difficulty::Normal);
        assert_eq!(registry.current_tier().id, Difficulty::Normal);
    }

    #[test]
    fn test_unknown_saved_value_falls_back_to_normal() {
        let registry = DifficultyRegistry::new(catalog(), MemoryStore::with_value("Extreme"));
        assert_eq!(registry.current_tier_id(), Difficulty::Normal);
        assert_eq!(registry.load_persisted(), Difficulty::Normal);
    }

    #[test]
    fn test_restart_round_trip() {
        for difficulty in Difficulty::ALL {
            let store = MemoryStore::new();
            {
                let registry = DifficultyRegistry::new(catalog(), store.clone());
                registry.set_difficulty(difficulty);
            }
            let restarted = DifficultyRegistry::new(catalog(), store.clone());
            assert_eq!(restarted.load_persisted(), difficulty);
            assert_eq!(restarted.current_tier_id(), difficulty);
        }
    }

    #[test]
    fn test_restart_round_trip_through_profile_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playerdata.json");
        {
            let registry = DifficultyRegistry::new(catalog(), ProfileStore::at(&path));
            registry.set_difficulty(Difficulty::Easy);
        }
        let restarted = DifficultyRegistry::new(catalog(), ProfileStore::at(&path));
        assert_eq!(restarted.current_tier_id(), Difficulty::Easy);
    }

    #[test]
    fn test_listeners_run_in_order_after_update() {
        let registry = DifficultyRegistry::new(catalog(), MemoryStore::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second"] {
            let log = Arc::clone(&log);
            let observer = registry.clone();
            registry.subscribe(move |tier| {
                log.lock().push((name, tier, observer.current_tier_id()));
            });
        }

        registry.set_difficulty(Difficulty::Hard);

        assert_eq!(
            *log.lock(),
            vec![
                ("first", Difficulty::Hard, Difficulty::Hard),
                ("second", Difficulty::Hard, Difficulty::Hard),
            ]
        );
    }

    #[test]
    fn test_one_notification_per_call() {
        let registry = DifficultyRegistry::new(catalog(), MemoryStore::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        registry.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry.set_difficulty(Difficulty::Easy);
        registry.set_difficulty(Difficulty::Easy);

        assert_eq!(registry.current_tier_id(), Difficulty::Easy);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let registry = DifficultyRegistry::new(catalog(), MemoryStore::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = registry.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.set_difficulty(Difficulty::Hard);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[test]
    fn test_listener_can_touch_registry() {
        let registry = DifficultyRegistry::new(catalog(), MemoryStore::new());
        let inner = registry.clone();
        registry.subscribe(move |_| {
            // Would deadlock if a lock were held across the callback
            inner.subscribe(|_| {});
            let _ = inner.multiplier(StatKey::EnemySpeed);
        });

        registry.set_difficulty(Difficulty::Easy);
        assert_eq!(registry.subscriber_count(), 2);
    }

    #[test]
    fn test_nested_selection_is_delivered_last() {
        let registry = DifficultyRegistry::new(catalog(), MemoryStore::new());
        let switched = Arc::new(AtomicUsize::new(0));

        let inner = registry.clone();
        let flag = Arc::clone(&switched);
        registry.subscribe(move |tier| {
            if tier == Difficulty::Hard && flag.fetch_add(1, Ordering::SeqCst) == 0 {
                inner.set_difficulty(Difficulty::Easy);
            }
        });

        let health = crate::progression::LiveBinding::bind(StatKey::PlayerHealth, 5.0, &registry);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = Arc::clone(&seen);
        let observer = registry.clone();
        registry.subscribe(move |tier| {
            record.lock().push((tier, observer.current_tier_id()));
        });

        registry.set_difficulty(Difficulty::Hard);

        assert_eq!(registry.current_tier_id(), Difficulty::Easy);
        assert_eq!(
            *seen.lock(),
            vec![(Difficulty::Hard, Difficulty::Easy), (Difficulty::Easy, Difficulty::Easy)]
        );
        assert_eq!(health.snapshot().tier(), Difficulty::Easy);
        assert!(health.snapshot().is_current(&registry));
        assert_eq!(health.count(), 8);

        // The queue is empty again: a plain call notifies once
        seen.lock().clear();
        registry.set_difficulty(Difficulty::Normal);
        assert_eq!(*seen.lock(), vec![(Difficulty::Normal, Difficulty::Normal)]);
    }

    #[test]
    fn test_corrupt_profile_starts_on_normal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playerdata.json");
        std::fs::write(&path, "{ not json").unwrap();

        let registry = DifficultyRegistry::new(catalog(), ProfileStore::at(&path));
        assert_eq!(registry.current_tier_id(), Difficulty::Normal);

        registry.set_difficulty(Difficulty::Hard);
        assert!(registry.is_durable());
        let restarted = DifficultyRegistry::new(catalog(), ProfileStore::at(&path));
        assert_eq!(restarted.current_tier_id(), Difficulty::Hard);
    }

    #[test]
    fn test_invalid_selection_is_rejected() {
        let store = MemoryStore::new();
        let registry = DifficultyRegistry::new(catalog(), store.clone());
        registry.set_difficulty(Difficulty::Hard);

        assert!(matches!(registry.select("Extreme"), Err(DifficultyError::InvalidTier(_))));
        assert_eq!(registry.current_tier_id(), Difficulty::Hard);
        assert_eq!(store.write_count(), 1);

        assert_eq!(registry.select("easy").unwrap(), Difficulty::Easy);
        assert_eq!(store.value().as_deref(), Some("Easy"));
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let store = MemoryStore::new();
        let registry = DifficultyRegistry::new(catalog(), store.clone());
        store.set_fail_writes(true);

        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        registry.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry.set_difficulty(Difficulty::Hard);

        assert_eq!(registry.current_tier_id(), Difficulty::Hard);
        assert_eq!(notified.load(Ordering::SeqCst), 1);
        assert!(!registry.is_durable());
        assert_eq!(store.value(), None);

        store.set_fail_writes(false);
        registry.flush().unwrap();
        assert!(registry.is_durable());
        assert_eq!(store.value().as_deref(), Some("Hard"));
    }

    #[test]
    fn test_multiplier_tracks_selection() {
        let registry = DifficultyRegistry::new(catalog(), MemoryStore::new());
        assert_eq!(registry.multiplier(StatKey::EnemyDamage), 1.0);
        registry.set_difficulty(Difficulty::Hard);
        assert_eq!(registry.multiplier(StatKey::EnemyDamage), 1.5);
        assert_eq!(registry.resolve(10.0, StatKey::EnemyDamage), 15.0);
    }

    // The only test that touches the session-wide registry
    #[test]
    fn test_single_instance_through_both_access_paths() {
        let first = bootstrap(catalog(), MemoryStore::new());
        let second = global().unwrap();
        let third = bootstrap(catalog(), MemoryStore::with_value("Easy"));

        assert!(is_ready());
        assert!(DifficultyRegistry::same_instance(first, second));
        assert!(DifficultyRegistry::same_instance(first, third));

        first.set_difficulty(Difficulty::Hard);
        assert_eq!(second.current_tier_id(), Difficulty::Hard);
        assert_eq!(third.current_tier_id(), Difficulty::Hard);

        let cloned = second.clone();
        assert!(DifficultyRegistry::same_instance(&cloned, first));
    }
}
