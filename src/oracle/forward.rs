//! Forward iteration
//!
//! The forward map is the ground truth every construction is checked against.

use num_integer::Integer;
use num_traits::{One, Zero};

use super::{Convention, StepChoice, Value};

/// Forward trajectory of a value down to 1.
///
/// Each item is the backward choice that the forward step undoes: an odd
/// step yields [`StepChoice::Decrease`], an even step [`StepChoice::Increase`].
/// Iteration stops at 1 (and immediately for 0, which never reaches 1).
#[derive(Debug, Clone)]
pub struct Trajectory {
    current: Value,
    convention: Convention,
}

impl Trajectory {
    /// Start at `start`.
    pub fn new(start: Value, convention: Convention) -> Self {
        Self {
            current: start,
            convention,
        }
    }

    /// Value reached so far.
    pub fn current(&self) -> &Value {
        &self.current
    }
}

impl Iterator for Trajectory {
    type Item = StepChoice;

    fn next(&mut self) -> Option<StepChoice> {
        if self.current.is_one() || self.current.is_zero() {
            return None;
        }
        let choice = if self.current.is_odd() {
            StepChoice::Decrease
        } else {
            StepChoice::Increase
        };
        self.current = self.convention.forward_step(&self.current);
        Some(choice)
    }
}

/// Number of forward steps from `n` to 1; `None` for 0.
pub fn delay_of(n: &Value, convention: Convention) -> Option<usize> {
    if n.is_zero() {
        return None;
    }
    Some(Trajectory::new(n.clone(), convention).count())
}
