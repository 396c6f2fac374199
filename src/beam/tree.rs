//! Fixed-width lookahead buffer
//!
//! A flat array of 2^N slots encoding a complete binary tree.
//!
//! Build phase: at level i the stride is m = 2^(N-i); the node at j·m keeps
//! its INCREASE child in place and writes its DECREASE child at j·m + m/2.
//!
//!   N = 2:  [s, ·, ·, ·] → [2s, ·, d, ·] → [4s, d', 2d, d'']
//!
//! Steady state: survivors sit at even indices and each one refills its odd
//! neighbour, so stride 1 replaces the build strides.

use crate::oracle::{DivergenceMode, Slot, StepOracle, Value};
use crate::{SearchError, MAX_LOOKAHEAD};

/// Buffer of 2^depth candidate values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeamTree {
    slots: Vec<Slot>,
}

impl BeamTree {
    /// Grow a complete tree of depth `depth` from `seed`.
    ///
    /// Fails without allocating when `depth` is 0 or above [`MAX_LOOKAHEAD`],
    /// and with [`SearchError::WindowAllocationFailed`] when the allocator
    /// refuses the window.
    pub fn bifurcate(oracle: &StepOracle, seed: Value, depth: u32) -> Result<Self, SearchError> {
        if depth == 0 {
            return Err(SearchError::ZeroLookahead);
        }
        if depth > MAX_LOOKAHEAD {
            return Err(SearchError::LookaheadExceedsAddressSpace {
                lookahead: depth,
                max: MAX_LOOKAHEAD,
            });
        }

        let width = 1usize << depth;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(width)
            .map_err(|_| SearchError::WindowAllocationFailed { lookahead: depth })?;
        slots.resize(width, Slot::Dead);
        slots[0] = Slot::Live(seed);
        let mut tree = Self { slots };

        for level in 0..depth {
            let stride = 1usize << (depth - level);
            let offset = stride >> 1;
            for node in 0..(1usize << level) {
                tree.take_step(oracle, node * stride, offset, DivergenceMode::Strict);
            }
        }

        Ok(tree)
    }

    #[cfg(test)]
    pub(crate) fn from_slots(slots: Vec<Slot>) -> Self {
        assert!(slots.len().is_power_of_two() && slots.len() >= 2);
        Self { slots }
    }

    /// Number of slots, 2^N.
    pub fn width(&self) -> usize {
        self.slots.len()
    }

    /// Current leaves.
    pub fn leaves(&self) -> &[Slot] {
        &self.slots
    }

    /// Live leaves.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_dead()).count()
    }

    /// Smallest live leaf.
    pub fn min_live(&self) -> Option<&Value> {
        self.slots.iter().min().and_then(Slot::value)
    }

    /// Keep the smallest half of the leaves, spread onto even indices.
    ///
    /// A tree always holds at least two slots. Dead leaves order after every live one, so they are the first to go.
    /// Odd indices are cleared to [`Slot::Dead`] ready for
    /// [`BeamTree::advance_one_level`]. Survivor order is unspecified.
    pub fn collapse_to_smallest_half(&mut self) {
        let half = self.slots.len() / 2;
        self.slots.select_nth_unstable(half - 1);

        // Walking down keeps slot i untouched until it is moved
        for i in (1..half).rev() {
            self.slots.swap(i, 2 * i);
        }
        for slot in self.slots.iter_mut().skip(1).step_by(2) {
            *slot = Slot::Dead;
        }
    }

    /// Advance every even slot one backward step.
    ///
    /// INCREASE overwrites the slot, DECREASE (or Dead) lands in the odd
    /// neighbour. A dead slot yields two dead children.
    pub fn advance_one_level(&mut self, oracle: &StepOracle, mode: DivergenceMode) {
        for index in (0..self.slots.len()).step_by(2) {
            self.take_step(oracle, index, 1, mode);
        }
    }

    fn take_step(&mut self, oracle: &StepOracle, index: usize, offset: usize, mode: DivergenceMode) {
        let (increase, decrease) = match &self.slots[index] {
            Slot::Live(value) => {
                let (increase, decrease) = oracle.step(value, mode);
                (Slot::Live(increase), decrease)
            }
            Slot::Dead => (Slot::Dead, Slot::Dead),
        };
        self.slots[index] = increase;
        self.slots[index + offset] = decrease;
    }
}
