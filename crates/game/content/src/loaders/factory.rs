//! Content factory for building a game from a data directory.

use std::path::{Path, PathBuf};

use idle_core::{Game, GameCatalog, GameConfig};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

/// Catalog file names tried in order.
const CATALOG_FILES: [&str; 2] = ["catalog.ron", "catalog.json"];

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── game.toml        (optional, defaults otherwise)
/// └── catalog.ron      (or catalog.json)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `game.toml`, or the defaults if absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("game.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no game.toml, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the catalog from the first catalog file present.
    pub fn load_catalog(&self) -> LoadResult<GameCatalog> {
        let path = self.catalog_path().ok_or_else(|| {
            anyhow::anyhow!(
                "No catalog file ({}) in {}",
                CATALOG_FILES.join(" or "),
                self.data_dir.display()
            )
        })?;
        CatalogLoader::load(&path)
    }

    /// Load configuration and catalog and build a fresh game.
    pub fn load_game(&self) -> LoadResult<Game> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        Ok(Game::new(catalog, config))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn catalog_path(&self) -> Option<PathBuf> {
        CATALOG_FILES
            .iter()
            .map(|name| self.data_dir.join(name))
            .find(|path| path.exists())
    }
}
