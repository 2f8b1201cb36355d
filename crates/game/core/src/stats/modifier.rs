//! Effects, modifiers and the modifier stack.
//!
//! All stat values use the same composition:
//!
//! ```text
//! result = ((base + Σflat) × (1 + Σpercentage)) / (1 + ΣinversePercentage)
//! ```
//!
//! Percentages are fractions: `0.25` is +25%.

use crate::fixed::FixedPoint;
use crate::ids::{SkillId, StatId};

/// How an effect value composes into a stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum EffectKind {
    /// Added to the base before any multiplier.
    Flat,
    /// Summed, then multiplies `(base + flat)` by `1 + Σ`.
    Percentage,
    /// Summed, then divides by `1 + Σ`. Speed bonuses shorten durations this way.
    InversePercentage,
}

/// A single contribution to a stat, registered by a source.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Effect {
    pub stat_id: StatId,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: EffectKind,
    pub value: FixedPoint,
}

impl Effect {
    pub fn new(stat_id: impl Into<StatId>, kind: EffectKind, value: FixedPoint) -> Self {
        Self {
            stat_id: stat_id.into(),
            kind,
            value,
        }
    }

    pub fn flat(stat_id: impl Into<StatId>, value: FixedPoint) -> Self {
        Self::new(stat_id, EffectKind::Flat, value)
    }

    pub fn percentage(stat_id: impl Into<StatId>, value: FixedPoint) -> Self {
        Self::new(stat_id, EffectKind::Percentage, value)
    }

    pub fn inverse_percentage(stat_id: impl Into<StatId>, value: FixedPoint) -> Self {
        Self::new(stat_id, EffectKind::InversePercentage, value)
    }

    /// Same effect with its value multiplied by an unscaled factor.
    pub fn scaled(&self, factor: i64) -> Self {
        Self {
            stat_id: self.stat_id.clone(),
            kind: self.kind,
            value: self.value.mul_int(factor),
        }
    }
}

/// Parsed form of a source id.
///
/// Source ids are plain strings so any subsystem can register effects;
/// a few shapes carry meaning:
///
/// - `equipment:<slot>`
/// - `consumable:<skillId>:<slotIndex>`: availability is limited by the slot
/// - `skill:<skillId>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectSource {
    Equipment { slot: String },
    Consumable { skill_id: SkillId, slot: usize },
    Skill { skill_id: SkillId },
    Other(String),
}

impl EffectSource {
    pub fn parse(source_id: &str) -> Self {
        let mut parts = source_id.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("equipment"), Some(slot), None) => Self::Equipment {
                slot: slot.to_owned(),
            },
            (Some("consumable"), Some(skill), Some(slot)) => match slot.parse() {
                Ok(slot) => Self::Consumable {
                    skill_id: SkillId::from(skill),
                    slot,
                },
                Err(_) => Self::Other(source_id.to_owned()),
            },
            (Some("skill"), Some(skill), None) => Self::Skill {
                skill_id: SkillId::from(skill),
            },
            _ => Self::Other(source_id.to_owned()),
        }
    }

    pub fn equipment(slot: &str) -> String {
        format!("equipment:{slot}")
    }

    pub fn consumable(skill_id: &SkillId, slot: usize) -> String {
        format!("consumable:{skill_id}:{slot}")
    }

    pub fn skill(skill_id: &SkillId) -> String {
        format!("skill:{skill_id}")
    }
}

/// How long a modifier's source stays active, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    Unbounded,
    Limited(FixedPoint),
}

impl Availability {
    /// True if the source lasts at least `duration`.
    pub fn covers(self, duration: FixedPoint) -> bool {
        match self {
            Availability::Unbounded => true,
            Availability::Limited(available) => available >= duration,
        }
    }
}

/// An effect resolved against its source's availability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modifier {
    pub kind: EffectKind,
    pub value: FixedPoint,
    pub source_id: String,
    pub availability: Availability,
}

impl Modifier {
    /// Ad-hoc modifier with unbounded availability.
    pub fn unbounded(kind: EffectKind, value: FixedPoint) -> Self {
        Self {
            kind,
            value,
            source_id: String::new(),
            availability: Availability::Unbounded,
        }
    }
}

/// Sums of each modifier kind, ready to be applied to a base value.
///
/// # Example
/// ```
/// # use idle_core::{EffectKind, FixedPoint, ModifierStack};
/// let mut stack = ModifierStack::new();
/// stack.add(EffectKind::Flat, FixedPoint::from_int(2));
/// stack.add(EffectKind::Percentage, FixedPoint::from_f64(0.5));
/// stack.add(EffectKind::InversePercentage, FixedPoint::from_int(1));
/// // ((10 + 2) × 1.5) / 2 = 9
/// assert_eq!(stack.apply(FixedPoint::from_int(10)), FixedPoint::from_int(9));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModifierStack {
    flat: FixedPoint,
    percentage: FixedPoint,
    inverse_percentage: FixedPoint,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: EffectKind, value: FixedPoint) {
        match kind {
            EffectKind::Flat => self.flat += value,
            EffectKind::Percentage => self.percentage += value,
            EffectKind::InversePercentage => self.inverse_percentage += value,
        }
    }

    pub fn extend<'a>(&mut self, modifiers: impl IntoIterator<Item = &'a Modifier>) {
        for modifier in modifiers {
            self.add(modifier.kind, modifier.value);
        }
    }

    /// Apply the stack to a base value.
    ///
    /// A denominator `1 + ΣinversePercentage` that is zero or negative is
    /// clamped to [`FixedPoint::EPSILON`].
    pub fn apply(&self, base: FixedPoint) -> FixedPoint {
        let numerator = (base + self.flat).mul(FixedPoint::ONE + self.percentage);
        let mut denominator = FixedPoint::ONE + self.inverse_percentage;
        if denominator <= FixedPoint::ZERO {
            tracing::warn!(
                inverse_percentage = %self.inverse_percentage,
                "inverse percentage sum reaches -1, clamping denominator"
            );
            denominator = FixedPoint::EPSILON;
        }
        numerator.div(denominator)
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_zero() && self.percentage.is_zero() && self.inverse_percentage.is_zero()
    }
}
