//! Progression systems
//!
//! Difficulty tiers, their catalog, the session registry and the bindings
//! entities use to read scaled stats.

pub mod difficulty;
pub mod catalog;
pub mod resolver;
pub mod registry;
pub mod binding;
pub mod levels;

pub use difficulty::{Difficulty, DifficultyTier, StatKey, StatKind};
pub use catalog::DifficultyCatalog;
pub use resolver::{resolve, resolve_count};
pub use registry::{DifficultyRegistry, SubscriptionId, bootstrap, global, is_ready};
pub use binding::{DifficultyScalable, LiveBinding, StatBinding};
pub use levels::{LevelDifficulty, LevelSettings, LevelTable};
