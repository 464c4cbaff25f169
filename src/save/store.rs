//! Durable storage for the selected difficulty
//!
//! [`ProfileStore`] keeps the selection inside the player's progression JSON.
//! [`MemoryStore`] is a shared in-process store for tests and headless runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::profile::ProgressionData;
use crate::error::PersistenceError;
use crate::progression::Difficulty;

/// File name of the progression record
pub const PROFILE_FILE: &str = "playerdata.json";

/// Key-value persistence collaborator used by the registry
pub trait DifficultyStore: Send {
    /// Raw persisted tier name, or `None` when nothing has been saved yet
    fn load_difficulty(&self) -> Result<Option<String>, PersistenceError>;

    /// Persist the selection without touching unrelated saved fields
    fn save_difficulty(&mut self, difficulty: Difficulty) -> Result<(), PersistenceError>;
}

/// Get the progression record path
pub fn profile_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "evergrove", "Evergrove") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push(PROFILE_FILE);
        path
    } else {
        PathBuf::from(format!("./{}", PROFILE_FILE))
    }
}

/// Progression record on disk
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Store at the platform data directory
    pub fn new() -> Self {
        Self::at(profile_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record. `Ok(None)` when no record exists yet.
    pub fn load(&self) -> Result<Option<ProgressionData>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        let record = serde_json::from_str(&data)?;
        Ok(Some(record))
    }

    pub fn save(&self, record: &ProgressionData) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, json)?;

        log::debug!("Progression saved to {:?}", self.path);
        Ok(())
    }

    /// Read-modify-write of the record.
    ///
    /// A missing record starts from defaults. A corrupt record is moved aside
    /// to `<file>.corrupt` and replaced, so one bad write cannot block saving
    /// forever.
    pub fn update<F>(&self, apply: F) -> Result<ProgressionData, PersistenceError>
    where
        F: FnOnce(&mut ProgressionData),
    {
        let mut record = match self.load() {
            Ok(Some(record)) => record,
            Ok(None) => ProgressionData::new(),
            Err(PersistenceError::Parse(e)) => {
                let backup = self.path.with_extension("json.corrupt");
                log::warn!("Progression record is corrupt ({}), moving it to {:?}", e, backup);
                fs::rename(&self.path, &backup)?;
                ProgressionData::new()
            }
            Err(e) => return Err(e),
        };

        apply(&mut record);
        self.save(&record)?;
        Ok(record)
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DifficultyStore for ProfileStore {
    fn load_difficulty(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.load()?.map(|record| record.selected_difficulty))
    }

    fn save_difficulty(&mut self, difficulty: Difficulty) -> Result<(), PersistenceError> {
        self.update(|record| record.set_difficulty(difficulty))?;
        log::info!("Saved difficulty {} to {:?}", difficulty, self.path);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    value: Option<String>,
    fail_writes: bool,
    writes: usize,
}

/// In-memory store. Clones share the same slot, which lets a test drop a
/// registry and build a new one over the "same disk".
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw saved value
    pub fn with_value(value: impl Into<String>) -> Self {
        let store = Self::new();
        store.state.lock().value = Some(value.into());
        store
    }

    pub fn value(&self) -> Option<String> {
        self.state.lock().value.clone()
    }

    /// Make subsequent writes fail, as a full disk would
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    /// Successful writes so far
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }
}

impl DifficultyStore for MemoryStore {
    fn load_difficulty(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.value())
    }

    fn save_difficulty(&mut self, difficulty: Difficulty) -> Result<(), PersistenceError> {
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(PersistenceError::WriteRejected("memory store is read-only".to_string()));
        }
        state.value = Some(difficulty.name().to_string());
        state.writes += 1;
        Ok(())
    }
}
