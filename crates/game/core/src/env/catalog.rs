use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::ids::{ActionId, EnemyId, ItemId, SkillId, StatId};

use super::actions::ActionConfig;
use super::enemies::EnemyConfig;
use super::items::{ChestConfig, ConsumableConfig, EquipmentConfig, ItemConfig};
use super::skills::{SkillConfig, StatConfig};

/// Immutable game content keyed by id.
///
/// Ordered maps keep iteration (combat skill discovery, stat bases)
/// deterministic.
#[derive(Clone, Debug, Default)]
pub struct GameCatalog {
    actions: BTreeMap<ActionId, ActionConfig>,
    items: BTreeMap<ItemId, ItemConfig>,
    skills: BTreeMap<SkillId, SkillConfig>,
    stats: BTreeMap<StatId, StatConfig>,
    enemies: BTreeMap<EnemyId, EnemyConfig>,
}

impl GameCatalog {
    pub fn builder() -> GameCatalogBuilder {
        GameCatalogBuilder::default()
    }

    pub fn action(&self, id: &ActionId) -> Result<&ActionConfig, ConfigError> {
        self.actions
            .get(id)
            .ok_or_else(|| ConfigError::ActionNotFound(id.clone()))
    }

    pub fn item(&self, id: &ItemId) -> Result<&ItemConfig, ConfigError> {
        self.items
            .get(id)
            .ok_or_else(|| ConfigError::ItemNotFound(id.clone()))
    }

    pub fn skill(&self, id: &SkillId) -> Result<&SkillConfig, ConfigError> {
        self.skills
            .get(id)
            .ok_or_else(|| ConfigError::SkillNotFound(id.clone()))
    }

    pub fn enemy(&self, id: &EnemyId) -> Result<&EnemyConfig, ConfigError> {
        self.enemies
            .get(id)
            .ok_or_else(|| ConfigError::EnemyNotFound(id.clone()))
    }

    pub fn stat(&self, id: &StatId) -> Option<&StatConfig> {
        self.stats.get(id)
    }

    pub fn chest(&self, id: &ItemId) -> Result<&ChestConfig, ConfigError> {
        self.item(id)?
            .chest
            .as_ref()
            .ok_or_else(|| ConfigError::NotAChest(id.clone()))
    }

    pub fn equipment(&self, id: &ItemId) -> Result<&EquipmentConfig, ConfigError> {
        self.item(id)?
            .equipment
            .as_ref()
            .ok_or_else(|| ConfigError::NotEquipment(id.clone()))
    }

    pub fn consumable(&self, id: &ItemId) -> Result<&ConsumableConfig, ConfigError> {
        self.item(id)?
            .consumable
            .as_ref()
            .ok_or_else(|| ConfigError::NotConsumable(id.clone()))
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionConfig> {
        self.actions.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemConfig> {
        self.items.values()
    }

    pub fn skills(&self) -> impl Iterator<Item = &SkillConfig> {
        self.skills.values()
    }

    pub fn stats(&self) -> impl Iterator<Item = &StatConfig> {
        self.stats.values()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EnemyConfig> {
        self.enemies.values()
    }

    /// Skills that share combat XP, in id order.
    pub fn combat_skills(&self) -> impl Iterator<Item = &SkillConfig> {
        self.skills.values().filter(|skill| skill.is_combat())
    }
}

/// Collects catalog entries; later entries with the same id replace earlier
/// ones.
#[derive(Clone, Debug, Default)]
pub struct GameCatalogBuilder {
    catalog: GameCatalog,
}

impl GameCatalogBuilder {
    pub fn action(mut self, action: ActionConfig) -> Self {
        self.catalog.actions.insert(action.id.clone(), action);
        self
    }

    pub fn item(mut self, item: ItemConfig) -> Self {
        self.catalog.items.insert(item.id.clone(), item);
        self
    }

    pub fn skill(mut self, skill: SkillConfig) -> Self {
        self.catalog.skills.insert(skill.id.clone(), skill);
        self
    }

    pub fn stat(mut self, stat: StatConfig) -> Self {
        self.catalog.stats.insert(stat.id.clone(), stat);
        self
    }

    pub fn enemy(mut self, enemy: EnemyConfig) -> Self {
        self.catalog.enemies.insert(enemy.id.clone(), enemy);
        self
    }

    pub fn actions(self, actions: impl IntoIterator<Item = ActionConfig>) -> Self {
        actions.into_iter().fold(self, Self::action)
    }

    pub fn items(self, items: impl IntoIterator<Item = ItemConfig>) -> Self {
        items.into_iter().fold(self, Self::item)
    }

    pub fn skills(self, skills: impl IntoIterator<Item = SkillConfig>) -> Self {
        skills.into_iter().fold(self, Self::skill)
    }

    pub fn stats(self, stats: impl IntoIterator<Item = StatConfig>) -> Self {
        stats.into_iter().fold(self, Self::stat)
    }

    pub fn enemies(self, enemies: impl IntoIterator<Item = EnemyConfig>) -> Self {
        enemies.into_iter().fold(self, Self::enemy)
    }

    pub fn build(self) -> GameCatalog {
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::FixedPoint;

    fn catalog() -> GameCatalog {
        GameCatalog::builder()
            .action(ActionConfig::new(
                "chop",
                "woodcutting",
                FixedPoint::from_int(5),
                FixedPoint::from_int(10),
            ))
            .item(ItemConfig::material("wood"))
            .item(ItemConfig::chest(
                "wood_chest",
                ChestConfig {
                    max_points: FixedPoint::from_int(1000),
                    loot: Vec::new(),
                },
            ))
            .skill(SkillConfig::new("woodcutting"))
            .skill(SkillConfig::combat("attack", FixedPoint::from_raw(500)))
            .skill(SkillConfig::combat("defence", FixedPoint::from_raw(500)))
            .build()
    }

    #[test]
    fn missing_action_is_a_config_error() {
        let err = catalog().action(&ActionId::new("mine")).unwrap_err();
        assert_eq!(err, ConfigError::ActionNotFound(ActionId::new("mine")));
    }

    #[test]
    fn shape_lookups_check_the_shape() {
        let catalog = catalog();
        assert!(catalog.chest(&ItemId::new("wood_chest")).is_ok());
        assert_eq!(
            catalog.chest(&ItemId::new("wood")).unwrap_err(),
            ConfigError::NotAChest(ItemId::new("wood"))
        );
        assert_eq!(
            catalog.equipment(&ItemId::new("nope")).unwrap_err(),
            ConfigError::ItemNotFound(ItemId::new("nope"))
        );
    }

    #[test]
    fn combat_skills_are_discovered_from_ratios() {
        let ids: Vec<_> = catalog()
            .combat_skills()
            .map(|s| s.id.as_str().to_owned())
            .collect();
        assert_eq!(ids, vec!["attack", "defence"]);
    }
}
