//! Fixed-point numerics.
//!
//! Every game quantity that is stored or propagated (durations, XP, chest
//! points, stat values, HP) is a [`FixedPoint`]: an `i64` holding the real
//! value scaled by [`FixedPoint::SCALE`]. Conversions to and from `f64` only
//! happen at I/O boundaries (content loading, display).
//!
//! # Rounding
//!
//! Scaled multiplication and division floor their result (round toward
//! negative infinity). Applying one rule everywhere keeps repeated
//! accumulation free of drift: the same inputs always land on the same unit.
//!
//! # Units
//!
//! Durations are FixedPoint seconds, so the raw value of a duration is its
//! length in milliseconds.
//!
//! Raw integers never convert implicitly: build values with
//! [`FixedPoint::from_int`], [`FixedPoint::from_raw`] or
//! [`FixedPoint::from_f64`].

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Real number scaled by 1000 and stored as an integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPoint(i64);

impl FixedPoint {
    /// Scale factor between the stored integer and the real value.
    pub const SCALE: i64 = 1000;

    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(Self::SCALE);
    /// Smallest representable positive value (0.001).
    pub const EPSILON: Self = Self(1);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);

    /// Wraps an already-scaled integer.
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the scaled integer.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Builds a value from a whole real number.
    pub const fn from_int(value: i64) -> Self {
        Self(value.saturating_mul(Self::SCALE))
    }

    /// Converts a real number, rounding half away from zero.
    ///
    /// Non-finite input maps to zero (NaN) or saturates (±∞).
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        // `as` saturates for out-of-range floats
        Self((value * Self::SCALE as f64).round() as i64)
    }

    /// Converts back to a real number.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Builds a duration from milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(if ms > i64::MAX as u64 { i64::MAX } else { ms as i64 })
    }

    /// Length of a duration in milliseconds (negative durations yield 0).
    pub const fn to_millis(self) -> u64 {
        if self.0 < 0 { 0 } else { self.0 as u64 }
    }

    /// Scaled multiplication, floored.
    pub fn mul(self, rhs: Self) -> Self {
        let product = self.0 as i128 * rhs.0 as i128;
        Self::saturate(product.div_euclid(Self::SCALE as i128))
    }

    /// Scaled division, floored. Division by zero yields `None`.
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.0 == 0 {
            return None;
        }
        let numerator = self.0 as i128 * Self::SCALE as i128;
        Some(Self::saturate(floor_div(numerator, rhs.0 as i128)))
    }

    /// Scaled division, floored. Division by zero saturates toward the sign
    /// of the dividend (zero stays zero).
    pub fn div(self, rhs: Self) -> Self {
        self.checked_div(rhs).unwrap_or(match self.0.signum() {
            1 => Self::MAX,
            -1 => Self(i64::MIN),
            _ => Self::ZERO,
        })
    }

    /// Remainder with the sign of the divisor (`rem_euclid` for positive
    /// divisors). A zero divisor returns `self`.
    pub fn rem(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return self;
        }
        let quotient = floor_div(self.0 as i128, rhs.0 as i128);
        Self::saturate(self.0 as i128 - quotient * rhs.0 as i128)
    }

    /// How many whole times `rhs` fits into `self`, floored.
    ///
    /// Zero or negative divisors yield `None`.
    pub fn whole_times(self, rhs: Self) -> Option<i64> {
        if rhs.0 <= 0 {
            return None;
        }
        Some(floor_div(self.0 as i128, rhs.0 as i128).clamp(i64::MIN as i128, i64::MAX as i128)
            as i64)
    }

    /// How many times `rhs` must be added to cover `self`, rounded up.
    pub fn whole_times_ceil(self, rhs: Self) -> Option<i64> {
        if rhs.0 <= 0 {
            return None;
        }
        let q = -floor_div(-(self.0 as i128), rhs.0 as i128);
        Some(q.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies by an unscaled count.
    pub fn mul_int(self, count: i64) -> Self {
        Self::saturate(self.0 as i128 * count as i128)
    }

    /// Divides by an unscaled count, floored. A zero count returns `self`.
    pub fn div_int(self, count: i64) -> Self {
        if count == 0 {
            return self;
        }
        Self::saturate(floor_div(self.0 as i128, count as i128))
    }

    /// Floors to a whole real number.
    pub fn floor_whole(self) -> Self {
        Self(self.0.div_euclid(Self::SCALE) * Self::SCALE)
    }

    /// Ceils to a whole real number.
    pub fn ceil_whole(self) -> Self {
        let floored = self.floor_whole();
        if floored == self {
            self
        } else {
            Self(floored.0.saturating_add(Self::SCALE))
        }
    }

    /// Rounds to the nearest whole real number, half away from zero.
    pub fn round_whole(self) -> Self {
        let half = Self::SCALE / 2;
        if self.0 >= 0 {
            Self((self.0.saturating_add(half)).div_euclid(Self::SCALE) * Self::SCALE)
        } else {
            -(-self).round_whole()
        }
    }

    /// Whole part, floored, as an unscaled integer.
    pub fn to_whole(self) -> i64 {
        self.0.div_euclid(Self::SCALE)
    }

    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Ratio `self / total` clamped to `[0, 1]`; zero or negative totals
    /// yield 0.
    pub fn ratio_of(self, total: Self) -> Self {
        if total.0 <= 0 {
            return Self::ZERO;
        }
        self.div(total).clamp(Self::ZERO, Self::ONE)
    }

    fn saturate(value: i128) -> Self {
        Self(value.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

fn floor_div(numerator: i128, denominator: i128) -> i128 {
    let q = numerator / denominator;
    if (numerator % denominator != 0) && ((numerator < 0) != (denominator < 0)) {
        q - 1
    } else {
        q
    }
}

impl Add for FixedPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl AddAssign for FixedPoint {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs);
    }
}

impl Sub for FixedPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl SubAssign for FixedPoint {
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.saturating_sub(rhs);
    }
}

impl Neg for FixedPoint {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for FixedPoint {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a FixedPoint> for FixedPoint {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        write!(f, "{}{}.{:03}", sign, abs / scale, abs % scale)
    }
}

// Real numbers on the wire; scaled integers in memory.
#[cfg(feature = "serde")]
impl serde::Serialize for FixedPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FixedPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom("fixed-point value must be finite"));
        }
        Ok(Self::from_f64(value))
    }
}
