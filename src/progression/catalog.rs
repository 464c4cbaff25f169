//! Difficulty catalog
//!
//! Loads the tier table from RON, with the shipped table embedded as the
//! fallback, and validates that every tier defines every stat.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, DifficultyTier, StatKey};
use crate::error::{CatalogError, DifficultyError};

/// Tier table shipped with the game
const DEFAULT_CATALOG_RON: &str = include_str!("../../assets/difficulty.ron");

/// On-disk layout of a catalog file
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    tiers: Vec<DifficultyTier>,
}

/// Immutable mapping from every [`Difficulty`] to its tier data
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyCatalog {
    tiers: [DifficultyTier; 3],
}

impl DifficultyCatalog {
    /// Validate tier definitions into a catalog.
    ///
    /// Requires exactly one definition per tier, every stat key in every tier,
    /// and every value finite and positive.
    pub fn build(defs: Vec<DifficultyTier>) -> Result<Self, CatalogError> {
        let mut slots: [Option<DifficultyTier>; 3] = [None, None, None];

        for tier in defs {
            for key in StatKey::ALL {
                let value = tier.stats.get(&key).copied().ok_or(CatalogError::IncompleteTier {
                    tier: tier.id,
                    stat: key,
                })?;
                if !value.is_finite() || value <= 0.0 {
                    return Err(CatalogError::InvalidValue { tier: tier.id, stat: key, value });
                }
            }

            let slot = &mut slots[tier.id.index()];
            if slot.is_some() {
                return Err(CatalogError::DuplicateTier(tier.id));
            }
            *slot = Some(tier);
        }

        let [easy, normal, hard] = slots;
        Ok(Self {
            tiers: [
                easy.ok_or(CatalogError::MissingTier(Difficulty::Easy))?,
                normal.ok_or(CatalogError::MissingTier(Difficulty::Normal))?,
                hard.ok_or(CatalogError::MissingTier(Difficulty::Hard))?,
            ],
        })
    }

    /// Parse and validate a RON catalog document
    pub fn from_ron(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            ron::from_str(source).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::build(file.tiers)
    }

    /// The catalog shipped with the game
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_ron(DEFAULT_CATALOG_RON)
    }

    /// Load an override file, or the embedded catalog when the file is absent.
    ///
    /// An override that exists but is unreadable or invalid is an error: a bad
    /// tuning file should stop startup instead of silently playing defaults.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            log::info!("No difficulty override at {:?}, using embedded catalog", path);
            return Self::embedded();
        }

        let content = fs::read_to_string(path)?;
        let catalog = Self::from_ron(&content)?;
        log::info!("Difficulty catalog loaded from {:?}", path);
        Ok(catalog)
    }

    /// Lookup by tier id. Total over the enum.
    pub fn get(&self, id: Difficulty) -> &DifficultyTier {
        &self.tiers[id.index()]
    }

    /// Lookup by tier name, as stored in saves or sent by UI
    pub fn get_by_name(&self, name: &str) -> Result<&DifficultyTier, DifficultyError> {
        let id: Difficulty = name.parse()?;
        Ok(self.get(id))
    }

    /// All tiers, easiest first
    pub fn tiers(&self) -> impl Iterator<Item = &DifficultyTier> {
        self.tiers.iter()
    }

    /// Serialize the catalog back to RON for designers to edit
    pub fn to_ron(&self) -> Result<String, CatalogError> {
        let file = CatalogFile { tiers: self.tiers.to_vec() };
        ron::ser::to_string_pretty(&file, ron::ser::PrettyConfig::default())
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn full_tier(id: Difficulty, value: f32) -> DifficultyTier {
        DifficultyTier {
            id,
            stats: StatKey::ALL.into_iter().map(|k| (k, value)).collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_embedded_catalog_is_complete() {
        let catalog = DifficultyCatalog::embedded().unwrap();
        for id in Difficulty::ALL {
            let tier = catalog.get(id);
            assert_eq!(tier.id, id);
            for key in StatKey::ALL {
                assert!(tier.stats.contains_key(&key), "{} missing {:?}", id, key);
            }
        }
    }

    #[test]
    fn test_embedded_values() {
        let catalog = DifficultyCatalog::embedded().unwrap();
        assert_eq!(catalog.get(Difficulty::Hard).value(StatKey::EnemyDamage), 1.5);
        assert_eq!(catalog.get(Difficulty::Easy).value(StatKey::PlayerHealth), 1.5);
        for key in StatKey::ALL {
            assert_eq!(catalog.get(Difficulty::Normal).value(key), if key == StatKey::SpawnHealth { 3.0 } else { 1.0 });
        }
    }

    #[test]
    fn test_missing_stat_is_rejected() {
        let mut easy = full_tier(Difficulty::Easy, 1.0);
        easy.stats.remove(&StatKey::HazardDamage);
        let result = DifficultyCatalog::build(vec![
            easy,
            full_tier(Difficulty::Normal, 1.0),
            full_tier(Difficulty::Hard, 1.0),
        ]);
        assert!(matches!(
            result,
            Err(CatalogError::IncompleteTier { tier: Difficulty::Easy, stat: StatKey::HazardDamage })
        ));
    }

    #[test]
    fn test_missing_and_duplicate_tiers() {
        let missing = DifficultyCatalog::build(vec![
            full_tier(Difficulty::Easy, 1.0),
            full_tier(Difficulty::Normal, 1.0),
        ]);
        assert!(matches!(missing, Err(CatalogError::MissingTier(Difficulty::Hard))));

        let duplicate = DifficultyCatalog::build(vec![
            full_tier(Difficulty::Easy, 1.0),
            full_tier(Difficulty::Easy, 1.0),
            full_tier(Difficulty::Hard, 1.0),
        ]);
        assert!(matches!(duplicate, Err(CatalogError::DuplicateTier(Difficulty::Easy))));
    }

    #[test]
    fn test_non_positive_value_is_rejected() {
        let result = DifficultyCatalog::build(vec![
            full_tier(Difficulty::Easy, 1.0),
            full_tier(Difficulty::Normal, 0.0),
            full_tier(Difficulty::Hard, 1.0),
        ]);
        assert!(matches!(result, Err(CatalogError::InvalidValue { tier: Difficulty::Normal, .. })));
    }

    #[test]
    fn test_get_by_name() {
        let catalog = DifficultyCatalog::embedded().unwrap();
        assert_eq!(catalog.get_by_name("hard").unwrap().id, Difficulty::Hard);
        assert!(matches!(catalog.get_by_name("Extreme"), Err(DifficultyError::InvalidTier(_))));
    }

    #[test]
    fn test_ron_export_reloads() {
        let catalog = DifficultyCatalog::embedded().unwrap();
        let ron = catalog.to_ron().unwrap();
        assert_eq!(DifficultyCatalog::from_ron(&ron).unwrap(), catalog);
    }

    #[test]
    fn test_load_override_file() {
        let dir = tempfile::tempdir().unwrap();

        let absent = dir.path().join("absent.ron");
        assert_eq!(DifficultyCatalog::load(&absent).unwrap(), DifficultyCatalog::embedded().unwrap());

        let broken = dir.path().join("broken.ron");
        fs::write(&broken, "(tiers: [(id: Easy, stats: {}))]").unwrap();
        assert!(DifficultyCatalog::load(&broken).is_err());
    }
}
