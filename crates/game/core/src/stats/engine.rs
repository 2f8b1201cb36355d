//! Source-keyed effect registry and stat resolution.
//!
//! Every subsystem that changes a stat (equipment, consumables, skill levels,
//! abilities) registers its effects under its own source id. Registering a
//! source again replaces its previous effects wholesale; removing it drops
//! them all at once. Stat values are recomputed on every read.

use std::collections::BTreeMap;

use crate::fixed::FixedPoint;
use crate::ids::StatId;

use super::modifier::{Availability, Effect, EffectKind, EffectSource, Modifier, ModifierStack};

/// Answers how long a source's effects remain available.
///
/// Only consumable sources are time-limited in practice; the implementation
/// decides per source.
pub trait EffectAvailability {
    fn availability(&self, source: &EffectSource) -> Availability;
}

/// Treats every source as permanently available.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysAvailable;

impl EffectAvailability for AlwaysAvailable {
    fn availability(&self, _source: &EffectSource) -> Availability {
        Availability::Unbounded
    }
}

/// Names a stat whose resolved value contributes to a derived value as `kind`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatRef {
    pub stat_id: StatId,
    pub kind: EffectKind,
}

impl StatRef {
    pub fn new(stat_id: impl Into<StatId>, kind: EffectKind) -> Self {
        Self {
            stat_id: stat_id.into(),
            kind,
        }
    }
}

/// Registry of stat base values and active effect sources.
#[derive(Clone, Debug, Default)]
pub struct StatEngine {
    base: BTreeMap<StatId, FixedPoint>,
    sources: BTreeMap<String, Vec<Effect>>,
}

impl StatEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine seeded with stat base values.
    pub fn with_base(base: impl IntoIterator<Item = (StatId, FixedPoint)>) -> Self {
        Self {
            base: base.into_iter().collect(),
            sources: BTreeMap::new(),
        }
    }

    pub fn set_base(&mut self, stat_id: StatId, value: FixedPoint) {
        self.base.insert(stat_id, value);
    }

    /// Base value of a stat; unknown stats have base 0.
    pub fn base(&self, stat_id: &StatId) -> FixedPoint {
        self.base.get(stat_id).copied().unwrap_or_default()
    }

    /// Replaces all effects previously registered under `source_id`.
    pub fn add_effects_from_source(&mut self, source_id: impl Into<String>, effects: Vec<Effect>) {
        let source_id = source_id.into();
        tracing::trace!(source = %source_id, count = effects.len(), "registering effects");
        self.sources.insert(source_id, effects);
    }

    /// Removes a source and all its effects. No-op if absent.
    pub fn remove_effects_from_source(&mut self, source_id: &str) {
        if self.sources.remove(source_id).is_some() {
            tracing::trace!(source = %source_id, "removed effect source");
        }
    }

    pub fn effects_from_source(&self, source_id: &str) -> Option<&[Effect]> {
        self.sources.get(source_id).map(Vec::as_slice)
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// All modifiers targeting `stat_id`, each tagged with its source's
    /// availability window.
    pub fn modifiers_by_stat_id(
        &self,
        stat_id: &StatId,
        availability: &dyn EffectAvailability,
    ) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        for (source_id, effects) in &self.sources {
            let mut window = None;
            for effect in effects.iter().filter(|e| &e.stat_id == stat_id) {
                let available = *window.get_or_insert_with(|| {
                    availability.availability(&EffectSource::parse(source_id))
                });
                modifiers.push(Modifier {
                    kind: effect.kind,
                    value: effect.value,
                    source_id: source_id.clone(),
                    availability: available,
                });
            }
        }
        modifiers
    }

    /// Final value of a stat, counting only sources that last at least
    /// `duration` seconds.
    pub fn stat_value(
        &self,
        stat_id: &StatId,
        duration: FixedPoint,
        availability: &dyn EffectAvailability,
    ) -> FixedPoint {
        let modifiers = self.modifiers_by_stat_id(stat_id, availability);
        let mut stack = ModifierStack::new();
        stack.extend(modifiers.iter().filter(|m| m.availability.covers(duration)));
        stack.apply(self.base(stat_id))
    }

    /// Caller-supplied base composed with resolved stats and extra modifiers.
    ///
    /// Each [`StatRef`] contributes the referenced stat's final value as its
    /// kind. Extra modifiers are filtered by the same duration window.
    pub fn derived_stat_value(
        &self,
        stat_refs: &[StatRef],
        base_value: FixedPoint,
        duration: FixedPoint,
        availability: &dyn EffectAvailability,
        extra_modifiers: &[Modifier],
    ) -> FixedPoint {
        let mut stack = ModifierStack::new();
        for stat_ref in stat_refs {
            let value = self.stat_value(&stat_ref.stat_id, duration, availability);
            stack.add(stat_ref.kind, value);
        }
        stack.extend(
            extra_modifiers
                .iter()
                .filter(|m| m.availability.covers(duration)),
        );
        stack.apply(base_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SkillId;

    fn fp(x: f64) -> FixedPoint {
        FixedPoint::from_f64(x)
    }

    /// Consumable sources last `seconds`; everything else is unbounded.
    struct ConsumablesLast(FixedPoint);

    impl EffectAvailability for ConsumablesLast {
        fn availability(&self, source: &EffectSource) -> Availability {
            match source {
                EffectSource::Consumable { .. } => Availability::Limited(self.0),
                _ => Availability::Unbounded,
            }
        }
    }

    fn speed() -> StatId {
        StatId::from("speed")
    }

    #[test]
    fn unknown_stat_is_zero() {
        let engine = StatEngine::new();
        assert_eq!(
            engine.stat_value(&StatId::from("nope"), FixedPoint::ZERO, &AlwaysAvailable),
            FixedPoint::ZERO
        );
    }

    #[test]
    fn registration_order_does_not_matter() {
        let a = vec![Effect::flat(speed(), fp(3.0))];
        let b = vec![
            Effect::percentage(speed(), fp(0.5)),
            Effect::inverse_percentage(speed(), fp(0.2)),
        ];

        let mut first = StatEngine::with_base([(speed(), fp(10.0))]);
        first.add_effects_from_source("a", a.clone());
        first.add_effects_from_source("b", b.clone());

        let mut second = StatEngine::with_base([(speed(), fp(10.0))]);
        second.add_effects_from_source("b", b);
        second.add_effects_from_source("a", a);

        let v1 = first.stat_value(&speed(), FixedPoint::ZERO, &AlwaysAvailable);
        let v2 = second.stat_value(&speed(), FixedPoint::ZERO, &AlwaysAvailable);
        assert_eq!(v1, v2);
        // (10 + 3) × 1.5 / 1.2 = 16.25
        assert_eq!(v1, fp(16.25));
    }

    #[test]
    fn re_registering_replaces_instead_of_merging() {
        let mut engine = StatEngine::new();
        let effects = vec![Effect::flat(speed(), fp(1.0))];
        engine.add_effects_from_source("equipment:weapon", effects.clone());
        let before = engine.modifiers_by_stat_id(&speed(), &AlwaysAvailable);
        engine.add_effects_from_source("equipment:weapon", effects);
        let after = engine.modifiers_by_stat_id(&speed(), &AlwaysAvailable);
        assert_eq!(before, after);
        assert_eq!(after.len(), 1);

        engine.add_effects_from_source(
            "equipment:weapon",
            vec![Effect::flat(StatId::from("other"), fp(1.0))],
        );
        assert!(engine.modifiers_by_stat_id(&speed(), &AlwaysAvailable).is_empty());
    }

    #[test]
    fn removing_a_source_drops_all_effects() {
        let mut engine = StatEngine::new();
        engine.add_effects_from_source(
            "skill:mining",
            vec![
                Effect::flat(speed(), fp(1.0)),
                Effect::percentage(speed(), fp(1.0)),
            ],
        );
        engine.remove_effects_from_source("skill:mining");
        engine.remove_effects_from_source("skill:mining");
        assert!(engine.modifiers_by_stat_id(&speed(), &AlwaysAvailable).is_empty());
    }

    #[test]
    fn short_lived_consumables_are_excluded_from_long_windows() {
        let mut engine = StatEngine::with_base([(speed(), fp(1.0))]);
        let source = EffectSource::consumable(&SkillId::from("mining"), 0);
        engine.add_effects_from_source(source, vec![Effect::flat(speed(), fp(4.0))]);
        let availability = ConsumablesLast(fp(2.0));

        assert_eq!(engine.stat_value(&speed(), FixedPoint::ZERO, &availability), fp(5.0));
        assert_eq!(engine.stat_value(&speed(), fp(2.0), &availability), fp(5.0));
        assert_eq!(engine.stat_value(&speed(), fp(2.001), &availability), fp(1.0));

        let modifiers = engine.modifiers_by_stat_id(&speed(), &availability);
        assert_eq!(modifiers[0].availability, Availability::Limited(fp(2.0)));
    }

    #[test]
    fn derived_value_uses_stat_refs_and_extras() {
        let mut engine = StatEngine::new();
        engine.add_effects_from_source("equipment:tool", vec![Effect::flat(speed(), fp(0.25))]);
        let value = engine.derived_stat_value(
            &[StatRef::new(speed(), EffectKind::InversePercentage)],
            fp(10.0),
            FixedPoint::ZERO,
            &AlwaysAvailable,
            &[Modifier::unbounded(EffectKind::Flat, fp(2.5))],
        );
        // (10 + 2.5) / 1.25 = 10
        assert_eq!(value, fp(10.0));
    }
}
