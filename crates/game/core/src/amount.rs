//! Repetition amounts for queued actions.
//!
//! Queue items repeat a finite number of times or forever. On the wire the
//! unbounded case is the sentinel `-1` so amounts stay plain integers; in
//! memory it is an enum so arithmetic never sees the sentinel.

/// Raw value that encodes [`Amount::Infinite`].
pub const INFINITE_AMOUNT: i64 = -1;

/// Number of repetitions left for a queued action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Amount {
    Finite(u64),
    Infinite,
}

impl Amount {
    /// Decodes the raw form. Any negative value is treated as unbounded.
    pub fn from_raw(raw: i64) -> Self {
        if raw < 0 {
            Amount::Infinite
        } else {
            Amount::Finite(raw as u64)
        }
    }

    pub fn to_raw(self) -> i64 {
        match self {
            Amount::Finite(n) => n.min(i64::MAX as u64) as i64,
            Amount::Infinite => INFINITE_AMOUNT,
        }
    }

    pub const fn is_infinite(self) -> bool {
        matches!(self, Amount::Infinite)
    }

    /// True for a finite amount with nothing left.
    pub const fn is_depleted(self) -> bool {
        matches!(self, Amount::Finite(0))
    }

    /// Repetitions left, `None` when unbounded.
    pub const fn remaining(self) -> Option<u64> {
        match self {
            Amount::Finite(n) => Some(n),
            Amount::Infinite => None,
        }
    }

    /// Caps a candidate batch size by what is left.
    pub fn cap(self, count: u64) -> u64 {
        match self {
            Amount::Finite(n) => n.min(count),
            Amount::Infinite => count,
        }
    }

    /// Subtracts completed repetitions, clamped at zero. Unbounded stays
    /// unbounded.
    pub fn saturating_sub(self, count: u64) -> Self {
        match self {
            Amount::Finite(n) => Amount::Finite(n.saturating_sub(count)),
            Amount::Infinite => Amount::Infinite,
        }
    }

    /// Real-valued view used by display code (`f64::INFINITY` when unbounded).
    pub fn as_f64(self) -> f64 {
        match self {
            Amount::Finite(n) => n as f64,
            Amount::Infinite => f64::INFINITY,
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Finite(1)
    }
}

impl From<u64> for Amount {
    fn from(count: u64) -> Self {
        Amount::Finite(count)
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Amount::Finite(count) => write!(f, "{count}"),
            Amount::Infinite => f.write_str("inf"),
        }
    }
}

impl core::str::FromStr for Amount {
    type Err = core::num::ParseIntError;

    /// Accepts a count, `inf`, or the raw sentinel `-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "inf" | "-1" => Ok(Amount::Infinite),
            count => count.parse().map(Amount::Finite),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.to_raw())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(Amount::from_raw)
    }
}
