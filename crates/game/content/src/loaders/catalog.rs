//! Catalog loader.

use std::path::Path;

use idle_core::{
    ActionConfig, ConfigError, EnemyConfig, GameCatalog, ItemConfig, ItemId, SkillConfig,
    StatConfig,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, load_file};

/// On-disk catalog layout. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub actions: Vec<ActionConfig>,
    pub items: Vec<ItemConfig>,
    pub skills: Vec<SkillConfig>,
    pub stats: Vec<StatConfig>,
    pub enemies: Vec<EnemyConfig>,
}

impl CatalogFile {
    pub fn into_catalog(self) -> GameCatalog {
        GameCatalog::builder()
            .actions(self.actions)
            .items(self.items)
            .skills(self.skills)
            .stats(self.stats)
            .enemies(self.enemies)
            .build()
    }
}

/// Loader for catalogs from RON or JSON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load and validate a catalog; the format follows the file extension.
    pub fn load(path: &Path) -> LoadResult<GameCatalog> {
        let file: CatalogFile = load_file(path)?;
        let catalog = file.into_catalog();
        Self::validate(&catalog)
            .map_err(|e| anyhow::anyhow!("Invalid catalog {}: {}", path.display(), e))?;
        tracing::debug!(
            path = %path.display(),
            actions = catalog.actions().count(),
            items = catalog.items().count(),
            enemies = catalog.enemies().count(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Checks that every id a definition refers to exists with the right
    /// shape.
    pub fn validate(catalog: &GameCatalog) -> Result<(), ConfigError> {
        for action in catalog.actions() {
            catalog.skill(&action.skill_id)?;
            for stack in action.ingredients.iter().chain(&action.products) {
                catalog.item(&stack.item_id)?;
            }
            if let Some(chest_id) = &action.chest_id {
                catalog.chest(chest_id)?;
            }
        }
        for item in catalog.items() {
            if let Some(chest) = &item.chest {
                Self::validate_loot(catalog, chest.loot.iter().map(|entry| &entry.item_id))?;
            }
            if let Some(consumable) = &item.consumable {
                catalog.skill(&consumable.skill_id)?;
            }
        }
        for enemy in catalog.enemies() {
            Self::validate_loot(catalog, enemy.loot.iter().map(|entry| &entry.item_id))?;
            if let Some(chest_id) = &enemy.chest_id {
                catalog.chest(chest_id)?;
            }
        }
        Ok(())
    }

    fn validate_loot<'a>(
        catalog: &GameCatalog,
        mut item_ids: impl Iterator<Item = &'a ItemId>,
    ) -> Result<(), ConfigError> {
        item_ids.try_for_each(|item_id| catalog.item(item_id).map(|_| ()))
    }
}
