//! Search statistics
//!
//! Memory is the binding resource: a window of `width` big integers whose
//! size grows with every step. The tracker records how wide the window
//! actually was and how large its values got.

use crate::oracle::{Slot, Value};

/// Summary of one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Slot capacity of the search window
    pub width: usize,
    /// Collapse/advance (or trim/expand) iterations performed
    pub iterations: usize,
    /// Most live candidates seen at once
    pub peak_live: usize,
    /// Fewest live candidates seen after the window first filled
    pub fewest_live: usize,
    /// Largest candidate, in bits
    pub peak_bits: u64,
}

impl SearchStats {
    /// Fraction of the window that was dead at its emptiest.
    pub fn worst_dead_fraction(&self) -> f64 {
        if self.width == 0 {
            return 0.0;
        }
        1.0 - self.fewest_live as f64 / self.width as f64
    }
}

/// Accumulates [`SearchStats`] across iterations.
#[derive(Debug)]
pub struct StatsTracker {
    stats: SearchStats,
}

impl StatsTracker {
    /// Tracker for a window of `width` slots.
    pub fn new(width: usize) -> Self {
        Self {
            stats: SearchStats {
                width,
                fewest_live: usize::MAX,
                ..SearchStats::default()
            },
        }
    }

    /// Record one beam-tree window.
    pub fn observe_slots(&mut self, slots: &[Slot]) {
        self.observe(slots.iter().filter_map(Slot::value));
    }

    /// Record one pool of values.
    pub fn observe_values(&mut self, values: &[Value]) {
        self.observe(values.iter());
    }

    fn observe<'a>(&mut self, live: impl Iterator<Item = &'a Value>) {
        let (count, bits) = live.fold((0usize, 0u64), |(count, bits), value| {
            (count + 1, bits.max(value.bits()))
        });
        self.stats.peak_live = self.stats.peak_live.max(count);
        self.stats.fewest_live = self.stats.fewest_live.min(count);
        self.stats.peak_bits = self.stats.peak_bits.max(bits);
    }

    /// Count one iteration.
    pub fn tick(&mut self) {
        self.stats.iterations += 1;
    }

    /// Finish tracking.
    pub fn finish(mut self) -> SearchStats {
        if self.stats.fewest_live == usize::MAX {
            self.stats.fewest_live = 0;
        }
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_live_and_bits() {
        let mut tracker = StatsTracker::new(4);
        tracker.observe_slots(&[
            Slot::Live(Value::from(255u32)),
            Slot::Dead,
            Slot::Live(Value::from(3u32)),
            Slot::Dead,
        ]);
        tracker.tick();
        tracker.observe_slots(&[
            Slot::Live(Value::from(1024u32)),
            Slot::Live(Value::from(1u32)),
            Slot::Live(Value::from(2u32)),
            Slot::Dead,
        ]);
        tracker.tick();

        let stats = tracker.finish();
        assert_eq!(stats.iterations, 2);
        assert_eq!(stats.peak_live, 3);
        assert_eq!(stats.fewest_live, 2);
        assert_eq!(stats.peak_bits, 11);
        assert!((stats.worst_dead_fraction() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_tracker() {
        let stats = StatsTracker::new(8).finish();
        assert_eq!(stats.fewest_live, 0);
        assert_eq!(stats.iterations, 0);
    }
}
