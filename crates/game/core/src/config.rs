use crate::fixed::FixedPoint;

/// Game-wide tunables. Missing keys in `game.toml` fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Pause between two battles of the same combat item.
    pub combat_respawn_ms: u64,
    pub max_level: u32,
    /// XP needed to go from level 1 to level 2.
    pub xp_base: FixedPoint,
    /// Per-level growth of the XP requirement, in percent.
    pub xp_growth_percent: FixedPoint,
    pub consumable_slots_per_skill: usize,
    /// Battles still running after this long count as lost.
    pub max_battle_seconds: FixedPoint,
    /// Upper bound on executor steps per runner pass.
    pub max_runner_steps: u32,
    /// Seed for loot rolls.
    pub seed: u64,
}

impl GameConfig {
    pub const DEFAULT_COMBAT_RESPAWN_MS: u64 = 3000;
    pub const DEFAULT_MAX_LEVEL: u32 = 99;
    pub const DEFAULT_XP_BASE: FixedPoint = FixedPoint::from_int(100);
    pub const DEFAULT_XP_GROWTH_PERCENT: FixedPoint = FixedPoint::from_int(10);
    pub const DEFAULT_CONSUMABLE_SLOTS: usize = 3;
    pub const DEFAULT_MAX_BATTLE_SECONDS: FixedPoint = FixedPoint::from_int(3600);
    pub const DEFAULT_MAX_RUNNER_STEPS: u32 = 10_000;

    pub fn new() -> Self {
        Self {
            combat_respawn_ms: Self::DEFAULT_COMBAT_RESPAWN_MS,
            max_level: Self::DEFAULT_MAX_LEVEL,
            xp_base: Self::DEFAULT_XP_BASE,
            xp_growth_percent: Self::DEFAULT_XP_GROWTH_PERCENT,
            consumable_slots_per_skill: Self::DEFAULT_CONSUMABLE_SLOTS,
            max_battle_seconds: Self::DEFAULT_MAX_BATTLE_SECONDS,
            max_runner_steps: Self::DEFAULT_MAX_RUNNER_STEPS,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_combat_respawn_ms(mut self, combat_respawn_ms: u64) -> Self {
        self.combat_respawn_ms = combat_respawn_ms;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
