//! Error types for difficulty configuration and persistence.

use thiserror::Error;

use crate::progression::{Difficulty, StatKey};

/// Errors surfaced by the difficulty system
#[derive(Debug, Error)]
pub enum DifficultyError {
    /// A tier name that is not one of Easy / Normal / Hard
    #[error("unknown difficulty tier: {0:?}")]
    InvalidTier(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Catalog construction failures. These are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("difficulty catalog has no entry for {0}")]
    MissingTier(Difficulty),

    #[error("difficulty catalog defines {0} more than once")]
    DuplicateTier(Difficulty),

    #[error("tier {tier} is missing stat {stat:?}")]
    IncompleteTier { tier: Difficulty, stat: StatKey },

    #[error("tier {tier} has invalid value {value} for {stat:?} (must be finite and > 0)")]
    InvalidValue {
        tier: Difficulty,
        stat: StatKey,
        value: f32,
    },

    #[error("failed to parse difficulty data: {0}")]
    Parse(String),

    #[error("failed to read difficulty data: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable store failures. Never fatal: the registry logs them and keeps going.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("save record is corrupt: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("save store rejected the write: {0}")]
    WriteRejected(String),
}

pub type Result<T, E = DifficultyError> = std::result::Result<T, E>;
