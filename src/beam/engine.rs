//! Lookahead beam search
//!
//! Build the 2^N tree once, then per iteration keep the smallest half of the
//! leaves and regrow each survivor by one level. Every leaf is always exactly
//! as deep as the others, so the window slides forward one step at a time
//! while the committed prefix is only materialised at the end.

use tracing::{debug, trace};

use super::BeamTree;
use crate::construction::{Construction, SEED, TAIL_STEPS, WARM_UP_STEPS};
use crate::oracle::{DivergenceMode, StepOracle, Value};
use crate::stats::{SearchStats, StatsTracker};
use crate::{check_lookahead, SearchError};

/// Beam search over backward constructions.
#[derive(Debug, Clone, Copy)]
pub struct BeamSearchEngine {
    oracle: StepOracle,
    lookahead: u32,
}

impl BeamSearchEngine {
    /// Engine with lookahead depth `lookahead` (window of 2^lookahead slots).
    pub fn new(oracle: StepOracle, lookahead: u32) -> Self {
        Self { oracle, lookahead }
    }

    /// Search for a small value of delay `delay`.
    pub fn search(&self, delay: usize) -> Result<Construction, SearchError> {
        self.search_with_stats(delay).map(|(construction, _)| construction)
    }

    /// As [`BeamSearchEngine::search`], also returning window statistics.
    ///
    /// Parameters are validated before the window is allocated.
    #[tracing::instrument(skip_all, name = "BeamSearchEngine.search", fields(delay = delay, lookahead = self.lookahead))]
    pub fn search_with_stats(
        &self,
        delay: usize,
    ) -> Result<(Construction, SearchStats), SearchError> {
        check_lookahead(delay, self.lookahead)?;

        let mut tree = BeamTree::bifurcate(&self.oracle, Value::from(SEED), self.lookahead)?;
        let mut tracker = StatsTracker::new(tree.width());
        tracker.observe_slots(tree.leaves());
        debug!(width = tree.width(), live = tree.live_count(), "lookahead tree built");

        let main_iterations = delay - WARM_UP_STEPS - self.lookahead as usize - TAIL_STEPS;
        for iteration in 0..main_iterations {
            self.iterate(&mut tree, &mut tracker, DivergenceMode::Strict);
            trace!(iteration, live = tree.live_count(), "window advanced");
        }

        for _ in 0..TAIL_STEPS {
            self.iterate(&mut tree, &mut tracker, DivergenceMode::Relaxed);
        }

        let best = tree.min_live().cloned().ok_or(SearchError::NoLiveBranch)?;
        let stats = tracker.finish();
        debug!(
            bits = best.bits(),
            peak_bits = stats.peak_bits,
            fewest_live = stats.fewest_live,
            "beam search complete"
        );

        let construction = Construction::recover(best, delay, self.oracle.convention())?;
        Ok((construction, stats))
    }

    fn iterate(&self, tree: &mut BeamTree, tracker: &mut StatsTracker, mode: DivergenceMode) {
        tree.collapse_to_smallest_half();
        tree.advance_one_level(&self.oracle, mode);
        tracker.observe_slots(tree.leaves());
        tracker.tick();
    }
}
