//! Capped-pool search
//!
//! An unstructured alternative to the beam tree: every candidate expands to
//! its INCREASE and (when valid) DECREASE predecessor, and whenever the pool
//! outgrows `paths` it is trimmed to its `paths` smallest members. Dead
//! branches are never stored, so the window only holds live values and
//! grows by less than 2× per step.

use tracing::{debug, trace};

use crate::construction::{Construction, SEED, TAIL_STEPS, WARM_UP_STEPS};
use crate::oracle::{DivergenceMode, StepOracle, Value};
use crate::stats::{SearchStats, StatsTracker};
use crate::{check_delay, SearchError};

/// Pool search keeping at most `paths` candidates per step.
#[derive(Debug, Clone, Copy)]
pub struct PoolSearch {
    oracle: StepOracle,
    paths: usize,
}

impl PoolSearch {
    /// Search keeping at most `paths` candidates between steps.
    pub fn new(oracle: StepOracle, paths: usize) -> Self {
        Self { oracle, paths }
    }

    /// Search for a small value of delay `delay`.
    pub fn search(&self, delay: usize) -> Result<Construction, SearchError> {
        self.search_with_stats(delay).map(|(construction, _)| construction)
    }

    /// As [`PoolSearch::search`], also returning pool statistics.
    #[tracing::instrument(skip_all, name = "PoolSearch.search", fields(delay = delay, paths = self.paths))]
    pub fn search_with_stats(
        &self,
        delay: usize,
    ) -> Result<(Construction, SearchStats), SearchError> {
        check_delay(delay)?;
        if self.paths == 0 {
            return Err(SearchError::ZeroPaths);
        }

        let mut pool = vec![Value::from(SEED)];
        let mut tracker = StatsTracker::new(self.paths.saturating_mul(2));

        for step in 0..delay - WARM_UP_STEPS - TAIL_STEPS {
            pool = self.expand(pool, DivergenceMode::Strict);
            tracker.observe_values(&pool);
            tracker.tick();
            trace!(step, size = pool.len(), "pool expanded");
        }
        for _ in 0..TAIL_STEPS {
            pool = self.expand(pool, DivergenceMode::Relaxed);
            tracker.observe_values(&pool);
            tracker.tick();
        }

        // INCREASE is always live, so the pool never empties
        let best = pool.into_iter().min().ok_or(SearchError::NoLiveBranch)?;
        let stats = tracker.finish();
        debug!(bits = best.bits(), peak_live = stats.peak_live, "pool search complete");

        let construction = Construction::recover(best, delay, self.oracle.convention())?;
        Ok((construction, stats))
    }

    fn expand(&self, mut pool: Vec<Value>, mode: DivergenceMode) -> Vec<Value> {
        if pool.len() > self.paths {
            pool.select_nth_unstable(self.paths - 1);
            pool.truncate(self.paths);
        }

        let mut next = Vec::with_capacity(pool.len() * 2);
        for value in pool {
            if let Some(decrease) = self.oracle.decrease(&value, mode) {
                next.push(decrease);
            }
            next.push(self.oracle.increase(&value));
        }
        next
    }
}
