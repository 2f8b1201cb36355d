//! Derived values: configured base values adjusted by stats and skill levels.
//!
//! Action duration, XP and chest points are all [`DerivedValueConfig`]s. A
//! derived value is evaluated against a duration window so that buffs which
//! will not last the whole window are excluded.
//!
//! Duration itself is self-referential: speed buffs shorten the action, and
//! the action's length decides which buffs last long enough to count. The
//! solver iterates from a zero estimate until two estimates agree, an earlier
//! estimate repeats (oscillation), or the iteration cap is hit.

use crate::error::ConvergenceError;
use crate::fixed::FixedPoint;
use crate::ids::StatId;

use super::engine::{EffectAvailability, StatEngine};
use super::modifier::{EffectKind, ModifierStack};

/// Maximum number of evaluations for a self-referential solve.
pub const MAX_SELF_ITERATIONS: u32 = 10;

/// Two estimates closer than this are considered converged.
pub const CONVERGENCE_TOLERANCE: FixedPoint = FixedPoint::EPSILON;

/// A modifier in a derived value configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "modifierType", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum DerivedModifier {
    /// The resolved value of a stat, applied as `kind`.
    Stat {
        stat_id: StatId,
        #[cfg_attr(feature = "serde", serde(rename = "type"))]
        kind: EffectKind,
    },
    /// `(level - minLevel) × perLevelValue`, applied as `kind`.
    SkillLevel {
        #[cfg_attr(feature = "serde", serde(rename = "type"))]
        kind: EffectKind,
        per_level_value: FixedPoint,
    },
}

impl DerivedModifier {
    pub fn kind(&self) -> EffectKind {
        match self {
            DerivedModifier::Stat { kind, .. } | DerivedModifier::SkillLevel { kind, .. } => *kind,
        }
    }
}

/// Base value plus the modifiers that adjust it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DerivedValueConfig {
    pub base_value: FixedPoint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<DerivedModifier>,
}

impl DerivedValueConfig {
    /// A constant value with no modifiers.
    pub fn constant(base_value: FixedPoint) -> Self {
        Self {
            base_value,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: DerivedModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }
}

/// Duration window used to filter time-limited modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationWindow {
    /// Only sources lasting at least this many seconds count.
    Fixed(FixedPoint),
    /// The window is the value being computed.
    SelfReferential,
}

/// Outcome category of a self-referential solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SolveStatus {
    Converged,
    /// An estimate repeated; the largest value of the cycle was returned.
    Oscillating,
    /// The iteration cap was reached; the last estimate was returned.
    Exhausted,
}

/// Result of [`DerivedResolver::solve_self_referential`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelfSolve {
    pub value: FixedPoint,
    pub iterations: u32,
    pub status: SolveStatus,
}

impl SelfSolve {
    pub fn is_converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }

    /// Strict view: anything but convergence is an error.
    pub fn into_result(self) -> Result<FixedPoint, ConvergenceError> {
        if self.is_converged() {
            Ok(self.value)
        } else {
            Err(ConvergenceError {
                iterations: self.iterations,
                last: self.value,
            })
        }
    }
}

/// Caller hook that resolves a modifier's value itself.
///
/// Returning `None` falls back to the default resolution (stat lookups for
/// stat modifiers, zero for skill-level modifiers).
pub type ModifierOverride<'a> = &'a dyn Fn(&DerivedModifier) -> Option<FixedPoint>;

/// Evaluates [`DerivedValueConfig`]s against a stat engine.
#[derive(Clone, Copy)]
pub struct DerivedResolver<'a> {
    stats: &'a StatEngine,
    availability: &'a dyn EffectAvailability,
    resolve_override: Option<ModifierOverride<'a>>,
}

impl<'a> DerivedResolver<'a> {
    pub fn new(stats: &'a StatEngine, availability: &'a dyn EffectAvailability) -> Self {
        Self {
            stats,
            availability,
            resolve_override: None,
        }
    }

    pub fn with_override(mut self, resolve_override: ModifierOverride<'a>) -> Self {
        self.resolve_override = Some(resolve_override);
        self
    }

    /// Computes a derived value for the given window.
    pub fn calculate(&self, config: &DerivedValueConfig, window: DurationWindow) -> FixedPoint {
        match window {
            DurationWindow::Fixed(duration) => self.evaluate(config, duration),
            DurationWindow::SelfReferential => self.solve_self_referential(config).value,
        }
    }

    /// Iterates `value = f(window = value)` from a zero estimate.
    pub fn solve_self_referential(&self, config: &DerivedValueConfig) -> SelfSolve {
        let mut history = vec![FixedPoint::ZERO];
        let mut estimate = FixedPoint::ZERO;

        for iteration in 1..=MAX_SELF_ITERATIONS {
            let next = self.evaluate(config, estimate);

            if (next - estimate).abs() < CONVERGENCE_TOLERANCE {
                return SelfSolve {
                    value: next,
                    iterations: iteration,
                    status: SolveStatus::Converged,
                };
            }

            if let Some(start) = history.iter().position(|&seen| seen == next) {
                let value = history[start..]
                    .iter()
                    .copied()
                    .max()
                    .unwrap_or(next)
                    .max(next);
                tracing::warn!(
                    iterations = iteration,
                    cycle_len = history.len() - start,
                    value = %value,
                    "self-referential value oscillates, using largest estimate of the cycle"
                );
                return SelfSolve {
                    value,
                    iterations: iteration,
                    status: SolveStatus::Oscillating,
                };
            }

            history.push(next);
            estimate = next;
        }

        tracing::warn!(
            iterations = MAX_SELF_ITERATIONS,
            value = %estimate,
            "self-referential value did not converge"
        );
        SelfSolve {
            value: estimate,
            iterations: MAX_SELF_ITERATIONS,
            status: SolveStatus::Exhausted,
        }
    }

    fn evaluate(&self, config: &DerivedValueConfig, duration: FixedPoint) -> FixedPoint {
        let mut stack = ModifierStack::new();
        for modifier in &config.modifiers {
            let value = self
                .resolve_override
                .and_then(|resolve| resolve(modifier))
                .unwrap_or_else(|| self.default_value(modifier, duration));
            stack.add(modifier.kind(), value);
        }
        stack.apply(config.base_value)
    }

    fn default_value(&self, modifier: &DerivedModifier, duration: FixedPoint) -> FixedPoint {
        match modifier {
            DerivedModifier::Stat { stat_id, .. } => {
                self.stats.stat_value(stat_id, duration, self.availability)
            }
            DerivedModifier::SkillLevel { .. } => {
                tracing::debug!("skill-level modifier without a resolver, contributing 0");
                FixedPoint::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SkillId;
    use crate::stats::{AlwaysAvailable, Availability, Effect, EffectSource};

    fn fp(x: f64) -> FixedPoint {
        FixedPoint::from_f64(x)
    }

    struct ConsumablesLast(FixedPoint);

    impl EffectAvailability for ConsumablesLast {
        fn availability(&self, source: &EffectSource) -> Availability {
            match source {
                EffectSource::Consumable { .. } => Availability::Limited(self.0),
                _ => Availability::Unbounded,
            }
        }
    }

    fn speed_duration(base: f64) -> DerivedValueConfig {
        DerivedValueConfig::constant(fp(base)).with_modifier(DerivedModifier::Stat {
            stat_id: StatId::from("speed"),
            kind: EffectKind::InversePercentage,
        })
    }

    fn engine_with_speed_potion(bonus: f64) -> StatEngine {
        let mut engine = StatEngine::new();
        engine.add_effects_from_source(
            EffectSource::consumable(&SkillId::from("mining"), 0),
            vec![Effect::flat("speed", fp(bonus))],
        );
        engine
    }

    #[test]
    fn fixed_window_filters_short_buffs() {
        let engine = engine_with_speed_potion(1.0);
        let availability = ConsumablesLast(fp(3.0));
        let resolver = DerivedResolver::new(&engine, &availability);
        let config = speed_duration(10.0);

        assert_eq!(resolver.calculate(&config, DurationWindow::Fixed(fp(3.0))), fp(5.0));
        assert_eq!(resolver.calculate(&config, DurationWindow::Fixed(fp(4.0))), fp(10.0));
    }

    #[test]
    fn self_referential_converges_and_is_deterministic() {
        let engine = engine_with_speed_potion(1.0);
        let availability = ConsumablesLast(fp(8.0));
        let resolver = DerivedResolver::new(&engine, &availability);
        let config = speed_duration(10.0);

        let first = resolver.solve_self_referential(&config);
        let second = resolver.solve_self_referential(&config);
        assert_eq!(first, second);
        assert_eq!(first.status, SolveStatus::Converged);
        assert_eq!(first.value, fp(5.0));
        assert!(first.iterations <= MAX_SELF_ITERATIONS);
    }

    #[test]
    fn buff_too_short_for_shortened_action_is_dropped() {
        // With the buff the action takes 5s, but the buff only lasts 4s.
        let engine = engine_with_speed_potion(1.0);
        let availability = ConsumablesLast(fp(4.0));
        let resolver = DerivedResolver::new(&engine, &availability);

        let solve = resolver.solve_self_referential(&speed_duration(10.0));
        // 0 → 5 → 10 → 10
        assert_eq!(solve.status, SolveStatus::Converged);
        assert_eq!(solve.value, fp(10.0));
    }

    #[test]
    fn oscillation_is_detected() {
        // A slowdown: applies when the window is short, doubling the duration
        // past the buff's availability, which then excludes it again.
        let engine = engine_with_speed_potion(-0.5);
        let availability = ConsumablesLast(fp(7.0));
        let resolver = DerivedResolver::new(&engine, &availability);

        let solve = resolver.solve_self_referential(&speed_duration(5.0));
        assert_eq!(solve.status, SolveStatus::Oscillating);
        assert_eq!(solve.value, fp(10.0));
        assert!(solve.into_result().is_err());
    }

    #[test]
    fn override_resolves_skill_levels() {
        let engine = StatEngine::new();
        let resolver = DerivedResolver::new(&engine, &AlwaysAvailable);
        let config = DerivedValueConfig::constant(fp(10.0)).with_modifier(
            DerivedModifier::SkillLevel {
                kind: EffectKind::Percentage,
                per_level_value: fp(0.1),
            },
        );

        assert_eq!(
            resolver.calculate(&config, DurationWindow::Fixed(FixedPoint::ZERO)),
            fp(10.0)
        );

        let level_bonus = |m: &DerivedModifier| match m {
            DerivedModifier::SkillLevel { per_level_value, .. } => {
                Some(per_level_value.mul_int(5))
            }
            _ => None,
        };
        let resolver = resolver.with_override(&level_bonus);
        assert_eq!(
            resolver.calculate(&config, DurationWindow::Fixed(FixedPoint::ZERO)),
            fp(15.0)
        );
    }
}
