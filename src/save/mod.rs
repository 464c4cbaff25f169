//! Save/load system
//!
//! Handles the progression record and the selected difficulty.

pub mod profile;
pub mod store;

pub use profile::{LevelStats, ProgressionData, LEVEL_SLOTS, PROGRESSION_VERSION};
pub use store::{profile_path, DifficultyStore, MemoryStore, ProfileStore, PROFILE_FILE};
