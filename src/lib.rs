//! Evergrove - difficulty tiers for a small platformer
//!
//! Easy, Normal and Hard tiers scale player, enemy, hazard and pickup stats.
//! One registry per session owns the selected tier, persists it to the
//! player profile and tells listeners when it changes.

pub mod error;
pub mod progression;
pub mod save;
pub mod ecs;
pub mod entities;
pub mod game;

// Re-export commonly used types
pub use error::{CatalogError, DifficultyError, PersistenceError};
pub use progression::{Difficulty, DifficultyCatalog, DifficultyRegistry, DifficultyTier, StatKey};
