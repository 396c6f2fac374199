//! Committed backward construction
//!
//! Choices are stored one bit per step (set = DECREASE), in the order they
//! were taken walking backward from 1. The forward trajectory of the final
//! value visits the same steps in reverse.

use bitvec::prelude::*;
use num_traits::One;

use crate::oracle::{Convention, StepChoice, Trajectory, Value};
use crate::SearchError;

/// Steps in the fixed prefix 1 ← 2 ← 4 ← 8.
pub const WARM_UP_STEPS: usize = 3;

/// Value reached after the warm-up.
pub const SEED: u32 = 8;

/// Final steps taken with the divergence rule disabled.
pub const TAIL_STEPS: usize = 2;

/// Smallest delay a construction can target.
pub const MIN_DELAY: usize = WARM_UP_STEPS + TAIL_STEPS;

/// A value together with the backward path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Construction {
    choices: BitVec,
    value: Value,
    convention: Convention,
}

impl Construction {
    /// The 3-step warm-up: three INCREASE steps ending at 8.
    ///
    /// Starting here keeps every search out of the trivial 1 ↔ 2 cycle.
    pub fn warm_up(convention: Convention) -> Self {
        Self {
            choices: bitvec![0; WARM_UP_STEPS],
            value: Value::from(SEED),
            convention,
        }
    }

    /// Rebuild the path of `value` from its forward trajectory.
    ///
    /// Fails with [`SearchError::VerificationFailed`] unless `value` reaches
    /// 1 in exactly `delay` steps.
    pub fn recover(value: Value, delay: usize, convention: Convention) -> Result<Self, SearchError> {
        let mut trajectory = Trajectory::new(value.clone(), convention);
        let mut forward: BitVec = trajectory
            .by_ref()
            .take(delay + 1)
            .map(StepChoice::as_bit)
            .collect();

        if forward.len() != delay || !trajectory.current().is_one() {
            return Err(SearchError::VerificationFailed {
                expected: delay,
                actual: forward.len(),
            });
        }

        forward.reverse();
        Ok(Self {
            choices: forward,
            value,
            convention,
        })
    }

    pub(crate) fn push(&mut self, choice: StepChoice, value: Value) {
        self.choices.push(choice.as_bit());
        self.value = value;
    }

    /// Current value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Step-counting convention the path was built under.
    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// Steps taken, warm-up included.
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Always false; the warm-up is part of every construction.
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// INCREASE steps ("ups").
    pub fn ups(&self) -> usize {
        self.choices.count_zeros()
    }

    /// DECREASE steps ("downs").
    pub fn downs(&self) -> usize {
        self.choices.count_ones()
    }

    /// Choices in the order they were taken.
    pub fn choices(&self) -> impl Iterator<Item = StepChoice> + '_ {
        self.choices.iter().by_vals().map(StepChoice::from_bit)
    }

    /// Forward round-trip check.
    ///
    /// The value must reach 1 in exactly [`Construction::len`] forward steps
    /// and the forward parities must be the choices reversed.
    pub fn verify(&self) -> bool {
        let mut trajectory = Trajectory::new(self.value.clone(), self.convention);
        let mut backward = self.choices.iter().by_vals().rev();

        for forward in trajectory.by_ref().take(self.len()) {
            match backward.next() {
                Some(bit) if bit == forward.as_bit() => {}
                _ => return false,
            }
        }
        backward.next().is_none() && trajectory.current().is_one()
    }
}
