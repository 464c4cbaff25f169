//! Evergrove - Entry Point
//!
//! Boots the session difficulty registry, applies an optional difficulty from
//! the command line, loads the first level and reports its scaled stats.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use evergrove::ecs::{ContactDamage, Enemy, Hearts, Mobility, Name, Player};
use evergrove::game::Level;
use evergrove::progression::{self, DifficultyCatalog, LevelTable, StatKey};
use evergrove::save::ProfileStore;

/// Overrides the catalog file when set
const CATALOG_ENV: &str = "EVERGROVE_DIFFICULTY_FILE";

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .init();

    log::info!("Starting Evergrove v{}", env!("CARGO_PKG_VERSION"));

    let catalog = match env::var_os(CATALOG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            DifficultyCatalog::load(&path)
                .with_context(|| format!("loading difficulty catalog from {}", path.display()))?
        }
        None => DifficultyCatalog::embedded()?,
    };

    let store = ProfileStore::new();
    log::info!("Profile at {}", store.path().display());
    let registry = progression::bootstrap(catalog, store);

    if let Some(name) = env::args().nth(1) {
        registry.select(&name)?;
    }

    let levels = LevelTable::embedded()?;
    let mut level = Level::load(registry, &levels, 0);
    level.update();

    let tier = registry.current_tier();
    log::info!(
        "{}: enemy damage x{}, points x{}, time limit {}s",
        tier.id,
        registry.multiplier(StatKey::EnemyDamage),
        registry.multiplier(StatKey::PointsValue),
        level.settings.time_limit()
    );

    for (_, (name, hearts, mobility, _)) in level
        .world
        .query::<(&Name, &Hearts, &Mobility, &Player)>()
        .iter()
    {
        log::info!(
            "{}: {}/{} hearts, speed {:.2}, jump {:.2}",
            name.0, hearts.current, hearts.max, mobility.speed, mobility.jump_force
        );
    }
    for (_, (name, damage, mobility, _)) in level
        .world
        .query::<(&Name, &ContactDamage, &Mobility, &Enemy)>()
        .iter()
    {
        log::info!("{}: damage {}, speed {:.2}", name.0, damage.amount, mobility.speed);
    }

    if let Err(e) = registry.flush() {
        log::error!("Failed to save difficulty on exit: {}", e);
    }

    log::info!("Evergrove shut down cleanly");
    Ok(())
}
