//! Resolves catalog actions against the current player state.
//!
//! Resolved actions are never cached: skill levels and active effects
//! change between reads.

use crate::env::{ActionConfig, GameCatalog, ItemStack};
use crate::error::ConfigError;
use crate::fixed::FixedPoint;
use crate::ids::{ActionId, ItemId, SkillId};
use crate::state::SkillBook;
use crate::stats::{
    DerivedModifier, DerivedResolver, DurationWindow, EffectAvailability, SelfSolve, StatEngine,
};

/// An action with duration, XP and chest points resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Action {
    pub id: ActionId,
    pub skill_id: SkillId,
    pub min_level: u32,
    pub duration_seconds: FixedPoint,
    pub xp: FixedPoint,
    pub chest_points: FixedPoint,
    pub ingredients: Vec<ItemStack>,
    pub products: Vec<ItemStack>,
    pub chest_id: Option<ItemId>,
}

impl Action {
    /// Duration in whole milliseconds, at least 1.
    pub fn duration_ms(&self) -> u64 {
        self.duration_seconds.raw().max(1) as u64
    }
}

/// Read-only view needed to resolve actions.
#[derive(Clone, Copy)]
pub struct ActionResolver<'a> {
    pub catalog: &'a GameCatalog,
    pub stats: &'a StatEngine,
    pub availability: &'a dyn EffectAvailability,
    pub skills: &'a SkillBook,
}

impl<'a> ActionResolver<'a> {
    pub fn new(
        catalog: &'a GameCatalog,
        stats: &'a StatEngine,
        availability: &'a dyn EffectAvailability,
        skills: &'a SkillBook,
    ) -> Self {
        Self {
            catalog,
            stats,
            availability,
            skills,
        }
    }

    /// Resolves `action_id`.
    ///
    /// Duration is solved self-referentially first; XP and chest points are
    /// then evaluated with that duration as the effect window, so a buff that
    /// runs out mid-action speeds nothing up and adds no XP.
    pub fn get_action_by_id(&self, action_id: &ActionId) -> Result<Action, ConfigError> {
        let config = self.catalog.action(action_id)?;
        let (action, _) = self.resolve(config);
        Ok(action)
    }

    /// Like [`Self::get_action_by_id`] but also returns the duration solve
    /// diagnostics.
    pub fn resolve(&self, config: &ActionConfig) -> (Action, SelfSolve) {
        let level = self.skills.get_skill_level(&config.skill_id);
        let levels_above_min = level as i64 - config.min_level as i64;
        let skill_level = move |modifier: &DerivedModifier| match modifier {
            DerivedModifier::SkillLevel { per_level_value, .. } => {
                Some(per_level_value.mul_int(levels_above_min))
            }
            DerivedModifier::Stat { .. } => None,
        };
        let resolver =
            DerivedResolver::new(self.stats, self.availability).with_override(&skill_level);

        let solve = resolver.solve_self_referential(&config.duration);
        if !solve.is_converged() {
            tracing::warn!(
                action_id = %config.id,
                iterations = solve.iterations,
                status = %solve.status,
                "action duration did not converge"
            );
        }
        let duration_seconds = solve.value.max(FixedPoint::ZERO);
        let window = DurationWindow::Fixed(duration_seconds);

        let action = Action {
            id: config.id.clone(),
            skill_id: config.skill_id.clone(),
            min_level: config.min_level,
            duration_seconds,
            xp: resolver.calculate(&config.xp, window),
            chest_points: resolver.calculate(&config.chest_points, window),
            ingredients: config.ingredients.clone(),
            products: config.products.clone(),
            chest_id: config.chest_id.clone(),
        };
        (action, solve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ActionConfig, GameCatalog};
    use crate::stats::{
        AlwaysAvailable, Availability, DerivedValueConfig, Effect, EffectKind, EffectSource,
    };

    fn fp(x: f64) -> FixedPoint {
        FixedPoint::from_f64(x)
    }

    /// Consumable sources last 4 seconds; everything else is permanent.
    struct FourSecondBuffs;

    impl EffectAvailability for FourSecondBuffs {
        fn availability(&self, source: &EffectSource) -> Availability {
            match source {
                EffectSource::Consumable { .. } => Availability::Limited(fp(4.0)),
                _ => Availability::Unbounded,
            }
        }
    }

    fn catalog() -> GameCatalog {
        let speed = DerivedModifier::Stat {
            stat_id: "miningSpeed".into(),
            kind: EffectKind::InversePercentage,
        };
        let xp_bonus = DerivedModifier::Stat {
            stat_id: "miningXp".into(),
            kind: EffectKind::Percentage,
        };
        let per_level = DerivedModifier::SkillLevel {
            kind: EffectKind::InversePercentage,
            per_level_value: fp(0.1),
        };
        GameCatalog::builder()
            .action(
                ActionConfig::new("mine_copper", "mining", fp(5.0), fp(10.0))
                    .with_duration(
                        DerivedValueConfig::constant(fp(5.0))
                            .with_modifier(speed)
                            .with_modifier(per_level),
                    )
                    .with_xp(DerivedValueConfig::constant(fp(10.0)).with_modifier(xp_bonus)),
            )
            .build()
    }

    #[test]
    fn unknown_action_is_an_error() {
        let catalog = catalog();
        let stats = StatEngine::new();
        let skills = SkillBook::default();
        let resolver = ActionResolver::new(&catalog, &stats, &AlwaysAvailable, &skills);
        let err = resolver.get_action_by_id(&ActionId::new("nope")).unwrap_err();
        assert_eq!(err, ConfigError::ActionNotFound(ActionId::new("nope")));
    }

    #[test]
    fn skill_level_shortens_duration() {
        let catalog = catalog();
        let stats = StatEngine::new();
        let mut skills = SkillBook::default();
        let resolver = ActionResolver::new(&catalog, &stats, &AlwaysAvailable, &skills);
        let base = resolver.get_action_by_id(&ActionId::new("mine_copper")).unwrap();
        assert_eq!(base.duration_seconds, fp(5.0));
        assert_eq!(base.xp, fp(10.0));

        // level 3: two levels above min, 5 / 1.2
        skills.add_skill_xp(&SkillId::new("mining"), FixedPoint::from_int(210));
        let resolver = ActionResolver::new(&catalog, &stats, &AlwaysAvailable, &skills);
        let leveled = resolver.get_action_by_id(&ActionId::new("mine_copper")).unwrap();
        assert_eq!(leveled.duration_seconds, fp(4.166));
    }

    #[test]
    fn short_buffs_skip_xp_but_may_speed_up() {
        let catalog = catalog();
        let mut stats = StatEngine::new();
        stats.add_effects_from_source(
            EffectSource::consumable(&SkillId::new("mining"), 0),
            vec![
                Effect::flat("miningSpeed", fp(0.25)),
                Effect::flat("miningXp", fp(0.5)),
            ],
        );
        let skills = SkillBook::default();
        let resolver = ActionResolver::new(&catalog, &stats, &FourSecondBuffs, &skills);
        let action = resolver.get_action_by_id(&ActionId::new("mine_copper")).unwrap();
        // With the buff the action takes 4s, which the 4s buff covers.
        assert_eq!(action.duration_seconds, fp(4.0));
        assert_eq!(action.xp, fp(15.0));
    }
}
