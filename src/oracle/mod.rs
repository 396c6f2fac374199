//! Step oracle
//!
//! Predecessor arithmetic for the 3n+1 map. From a current value n:
//!   INCREASE: n ← 2n        (reverse of an even step, always valid)
//!   DECREASE: n ← m, f(m)=n  (reverse of an odd step, conditional)
//!
//! No state and no failure: a missing DECREASE is reported as [`Slot::Dead`].

mod forward;

pub use forward::{delay_of, Trajectory};

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_integer::Integer;

/// Arbitrary-precision value carried through every search.
pub type Value = BigUint;

/// How an odd forward step is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Convention {
    /// Odd n → (3n+1)/2 counts as one step.
    #[default]
    Accelerated,
    /// Odd n → 3n+1 counts as one step; the halving that follows is a
    /// separate step.
    Standard,
}

impl Convention {
    /// Apply one forward step.
    pub fn forward_step(self, n: &Value) -> Value {
        if n.is_even() {
            return n >> 1u32;
        }
        let tripled = n * 3u32 + 1u32;
        match self {
            Convention::Accelerated => tripled >> 1u32,
            Convention::Standard => tripled,
        }
    }
}

/// Whether DECREASE may land on a multiple of 3.
///
/// A multiple of 3 has no DECREASE predecessor of its own, so every step
/// after it is forced to INCREASE. Only safe near the end of a construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DivergenceMode {
    /// Reject DECREASE candidates divisible by 3.
    Strict,
    /// Accept them.
    Relaxed,
}

impl DivergenceMode {
    #[inline]
    fn rejects_multiples_of_three(self) -> bool {
        matches!(self, DivergenceMode::Strict)
    }
}

/// Backward step taken while constructing a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepChoice {
    /// Reverse of an even step (×2).
    Increase,
    /// Reverse of an odd step.
    Decrease,
}

impl StepChoice {
    /// Bit encoding used by [`crate::Construction`]: DECREASE is set.
    #[inline]
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            StepChoice::Decrease
        } else {
            StepChoice::Increase
        }
    }

    /// Inverse of [`StepChoice::from_bit`].
    #[inline]
    pub fn as_bit(self) -> bool {
        matches!(self, StepChoice::Decrease)
    }
}

/// A candidate value or a dead branch.
///
/// Total order: live values compare numerically and every live value is
/// smaller than [`Slot::Dead`], so dead branches always sort last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    /// Reachable value.
    Live(Value),
    /// No valid predecessor on this branch.
    #[default]
    Dead,
}

impl Slot {
    /// True for [`Slot::Dead`].
    #[inline]
    pub fn is_dead(&self) -> bool {
        matches!(self, Slot::Dead)
    }

    /// Borrow the live value, if any.
    #[inline]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Slot::Live(v) => Some(v),
            Slot::Dead => None,
        }
    }
}

impl From<Option<Value>> for Slot {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Slot::Dead, Slot::Live)
    }
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Slot::Live(a), Slot::Live(b)) => a.cmp(b),
            (Slot::Live(_), Slot::Dead) => Ordering::Less,
            (Slot::Dead, Slot::Live(_)) => Ordering::Greater,
            (Slot::Dead, Slot::Dead) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Residue of `value` modulo 3.
///
/// 2^64 ≡ 1 (mod 3), so the sum of the 64-bit limbs has the same residue.
#[inline]
pub(crate) fn residue_mod3(value: &Value) -> u32 {
    let sum: u128 = value.iter_u64_digits().map(u128::from).sum();
    (sum % 3) as u32
}

/// Stateless predecessor oracle for one step-counting convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOracle {
    convention: Convention,
}

impl StepOracle {
    /// Oracle for the given convention.
    pub fn new(convention: Convention) -> Self {
        Self { convention }
    }

    /// Convention this oracle counts steps with.
    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// INCREASE predecessor: always `2 · value`.
    #[inline]
    pub fn increase(&self, value: &Value) -> Value {
        value << 1u32
    }

    /// DECREASE predecessor, or `None` when no valid one exists.
    pub fn decrease(&self, value: &Value, mode: DivergenceMode) -> Option<Value> {
        let candidate = match self.convention {
            Convention::Accelerated => {
                let doubled = self.increase(value);
                if residue_mod3(&doubled) != 1 {
                    return None;
                }
                doubled / 3u32
            }
            Convention::Standard => {
                if residue_mod3(value) != 1 {
                    return None;
                }
                let candidate = value / 3u32;
                if candidate.is_even() {
                    return None;
                }
                candidate
            }
        };

        if mode.rejects_multiples_of_three() && residue_mod3(&candidate) == 0 {
            return None;
        }
        Some(candidate)
    }

    /// Both predecessors of `value`: `(increase, decrease_or_dead)`.
    #[inline]
    pub fn step(&self, value: &Value, mode: DivergenceMode) -> (Value, Slot) {
        (self.increase(value), self.decrease(value, mode).into())
    }
}
