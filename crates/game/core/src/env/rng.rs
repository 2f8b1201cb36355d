//! Deterministic randomness for loot rolls.
//!
//! Every roll is a pure function of `(game_seed, nonce, context)`, so a saved
//! game replays the same drops. The nonce advances once per reward event
//! (a finished production batch, a won battle, an opened chest).

use crate::fixed::FixedPoint;

use super::actions::ItemStack;
use super::items::LootEntry;

/// Seed-to-number function.
///
/// Implementations must be deterministic: the same seed always yields the
/// same value.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Value in `[min, max]` inclusive.
    fn range(&self, seed: u64, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        let raw = self.next_u32(seed) as u64;
        match (max - min).checked_add(1) {
            Some(span) => min + raw % span,
            // `[0, u64::MAX]`: every draw is already in range.
            None => raw,
        }
    }

    /// Fraction in `[0, 1)` with millesimal resolution.
    fn fraction(&self, seed: u64) -> FixedPoint {
        FixedPoint::from_raw((self.next_u32(seed) % FixedPoint::SCALE as u32) as i64)
    }
}

/// PCG-XSH-RR: 64-bit LCG state, 32-bit permuted output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Mixes the game seed with a reward nonce and a per-roll context.
///
/// Use a distinct `context` for each independent roll within one reward
/// event (chance and count of every loot entry).
pub fn compute_seed(game_seed: u64, nonce: u64, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

/// Stateful loot roller: a seed plus the next reward nonce.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootRoller {
    seed: u64,
    nonce: u64,
}

impl LootRoller {
    pub fn new(seed: u64) -> Self {
        Self { seed, nonce: 0 }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Rolls `table` `times` times and returns the merged drops.
    ///
    /// Consumes one nonce regardless of `times`. Entries that dropped nothing
    /// are omitted; output order follows the table.
    pub fn roll(&mut self, table: &[LootEntry], times: u64) -> Vec<ItemStack> {
        let nonce = self.nonce;
        self.nonce = self.nonce.wrapping_add(1);
        roll_table(&PcgRng, self.seed, nonce, table, times)
    }
}

/// Pure loot roll used by [`LootRoller`].
///
/// Guaranteed entries (`chance >= 1`, `min == max`) skip the RNG so their
/// result scales exactly with `times`.
pub fn roll_table(
    rng: &dyn RngOracle,
    game_seed: u64,
    nonce: u64,
    table: &[LootEntry],
    times: u64,
) -> Vec<ItemStack> {
    let mut drops = Vec::new();
    for (index, entry) in table.iter().enumerate() {
        let guaranteed = entry.chance >= FixedPoint::ONE;
        let count = if guaranteed && entry.min >= entry.max {
            entry.min.saturating_mul(times)
        } else {
            let mut total = 0u64;
            for roll in 0..times {
                let context = (index as u32)
                    .wrapping_mul(0x1000)
                    .wrapping_add((roll as u32).wrapping_mul(2));
                let hit = guaranteed
                    || rng.fraction(compute_seed(game_seed, nonce, context)) < entry.chance;
                if hit {
                    let seed = compute_seed(game_seed, nonce, context.wrapping_add(1));
                    total = total.saturating_add(rng.range(seed, entry.min, entry.max));
                }
            }
            total
        };
        if count > 0 {
            drops.push(ItemStack::new(entry.item_id.clone(), count));
        }
    }
    drops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
        assert_ne!(rng.next_u32(42), rng.next_u32(43));
    }

    #[test]
    fn range_is_inclusive_and_bounded() {
        let rng = PcgRng;
        for seed in 0..500 {
            let value = rng.range(seed, 2, 5);
            assert!((2..=5).contains(&value));
        }
        assert_eq!(rng.range(7, 3, 3), 3);
    }

    #[test]
    fn full_width_range_does_not_overflow() {
        let rng = PcgRng;
        for seed in 0..50 {
            assert_eq!(rng.range(seed, 0, u64::MAX), rng.next_u32(seed) as u64);
            assert!(rng.range(seed, 1, u64::MAX) >= 1);
            assert!(rng.range(seed, u64::MAX - 1, u64::MAX) >= u64::MAX - 1);
        }
    }

    #[test]
    fn guaranteed_entries_scale_with_times() {
        let table = [LootEntry::guaranteed("coin", 3)];
        let mut roller = LootRoller::new(9);
        assert_eq!(roller.roll(&table, 4), vec![ItemStack::new("coin", 12)]);
        assert_eq!(roller.nonce(), 1);
    }

    #[test]
    fn zero_chance_never_drops() {
        let table = [LootEntry::new("gem", 1, 1, FixedPoint::ZERO)];
        let mut roller = LootRoller::new(1);
        assert!(roller.roll(&table, 100).is_empty());
    }

    #[test]
    fn same_seed_same_drops() {
        let table = [
            LootEntry::new("gem", 1, 3, FixedPoint::from_raw(500)),
            LootEntry::new("ore", 0, 4, FixedPoint::ONE),
        ];
        let mut a = LootRoller::new(77);
        let mut b = LootRoller::new(77);
        for _ in 0..5 {
            assert_eq!(a.roll(&table, 10), b.roll(&table, 10));
        }
    }
}
