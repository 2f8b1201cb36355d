//! Combatant stats.
//!
//! The player's combat stats are plain stats in the [`StatEngine`]; enemies
//! carry theirs in the catalog. Both are flattened into a
//! [`CombatantStats`] before simulating.

use crate::env::EnemyConfig;
use crate::fixed::FixedPoint;
use crate::ids::StatId;
use crate::stats::{EffectAvailability, StatEngine};

/// Stat ids read for the player.
pub const STAT_MAX_HP: &str = "maxHp";
pub const STAT_ATTACK_DAMAGE: &str = "attackDamage";
pub const STAT_ATTACK_INTERVAL: &str = "attackInterval";
pub const STAT_DAMAGE_TAKEN: &str = "damageTaken";

/// Bases used when the catalog does not define a combat stat.
pub fn default_player_bases() -> [(StatId, FixedPoint); 4] {
    [
        (StatId::new(STAT_MAX_HP), FixedPoint::from_int(10)),
        (StatId::new(STAT_ATTACK_DAMAGE), FixedPoint::from_int(1)),
        (StatId::new(STAT_ATTACK_INTERVAL), FixedPoint::from_int(3)),
        (StatId::new(STAT_DAMAGE_TAKEN), FixedPoint::ONE),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CombatantStats {
    pub max_hp: FixedPoint,
    /// Raw damage per attack, before the target's `damage_taken`.
    pub damage: FixedPoint,
    /// Seconds between attacks.
    pub attack_interval: FixedPoint,
    /// Incoming damage multiplier.
    pub damage_taken: FixedPoint,
}

impl CombatantStats {
    pub fn new(
        max_hp: FixedPoint,
        damage: FixedPoint,
        attack_interval: FixedPoint,
        damage_taken: FixedPoint,
    ) -> Self {
        Self {
            max_hp,
            damage,
            attack_interval,
            damage_taken,
        }
    }

    /// Player stats as currently resolved by the stat engine.
    pub fn player(stats: &StatEngine, availability: &dyn EffectAvailability) -> Self {
        let value = |id: &str| stats.stat_value(&StatId::new(id), FixedPoint::ZERO, availability);
        Self {
            max_hp: value(STAT_MAX_HP),
            damage: value(STAT_ATTACK_DAMAGE),
            attack_interval: value(STAT_ATTACK_INTERVAL),
            damage_taken: value(STAT_DAMAGE_TAKEN).max(FixedPoint::ZERO),
        }
    }

    pub fn enemy(config: &EnemyConfig) -> Self {
        Self {
            max_hp: config.max_hp,
            damage: config.damage,
            attack_interval: config.attack_interval_seconds,
            damage_taken: config.damage_taken.max(FixedPoint::ZERO),
        }
    }

    /// Damage one hit of `self` deals to `target`, floored to whole points.
    pub fn hit_damage(&self, target: &CombatantStats) -> FixedPoint {
        self.damage
            .mul(target.damage_taken)
            .floor_whole()
            .max(FixedPoint::ZERO)
    }

    /// True if attacking `target` can ever reduce its HP.
    pub fn can_hurt(&self, target: &CombatantStats) -> bool {
        self.attack_interval.is_positive() && self.hit_damage(target).is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{AlwaysAvailable, Effect};

    #[test]
    fn hit_damage_floors_after_multiplier() {
        let attacker = CombatantStats::new(
            FixedPoint::from_int(10),
            FixedPoint::from_int(7),
            FixedPoint::ONE,
            FixedPoint::ONE,
        );
        let target = CombatantStats::new(
            FixedPoint::from_int(10),
            FixedPoint::ZERO,
            FixedPoint::ONE,
            FixedPoint::from_f64(0.5),
        );
        assert_eq!(attacker.hit_damage(&target), FixedPoint::from_int(3));
        assert!(attacker.can_hurt(&target));
        assert!(!target.can_hurt(&attacker));
    }

    #[test]
    fn player_reads_engine_stats() {
        let mut engine = StatEngine::with_base(default_player_bases());
        engine.add_effects_from_source(
            "equipment:weapon",
            vec![Effect::flat(STAT_ATTACK_DAMAGE, FixedPoint::from_int(4))],
        );
        let player = CombatantStats::player(&engine, &AlwaysAvailable);
        assert_eq!(player.damage, FixedPoint::from_int(5));
        assert_eq!(player.max_hp, FixedPoint::from_int(10));
        assert_eq!(player.damage_taken, FixedPoint::ONE);
    }
}
