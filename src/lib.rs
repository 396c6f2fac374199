//! # Integers with a chosen Collatz delay
//!
//! Builds integers that take exactly `delay` steps to reach 1 under the
//! accelerated Collatz map (odd n → (3n+1)/2, even n → n/2), keeping the
//! result as small as the chosen strategy can manage.
//!
//! ## Approach
//!
//! Work backward from 1. Every value n has the predecessor 2n (INCREASE) and
//! sometimes a smaller one (DECREASE). Three strategies pick the path:
//!
//! 1. **Greedy**: DECREASE whenever allowed, unless a residue table vetoes it
//! 2. **Beam**: a 2^N-leaf lookahead window, halved and regrown every step
//! 3. **Pool**: a capped set of candidates trimmed to the smallest `paths`
//!
//! All three start from the warm-up 1 ← 2 ← 4 ← 8 and relax the
//! divergence rule for the last two steps.
//!
//! ## Usage Example
//!
//! ```
//! use collatz_delay::{DelaySearcher, SearchConfig};
//!
//! let report = DelaySearcher::new(SearchConfig::beam(100, 8)).run()?;
//! assert_eq!(report.construction.len(), 100);
//! assert_eq!(report.construction.value().to_string(), "2023");
//! # Ok::<(), collatz_delay::SearchError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules
pub mod oracle;       // Step arithmetic and the forward map
pub mod residue;      // Residue exception tables
pub mod construction; // Committed backward paths
pub mod greedy;       // Single-path builder
pub mod beam;         // Lookahead window search
pub mod pool;         // Capped-pool search
pub mod stats;        // Window statistics

// Re-exports for convenience
pub use beam::{BeamSearchEngine, BeamTree};
pub use construction::{Construction, MIN_DELAY};
pub use greedy::GreedyBuilder;
pub use oracle::{Convention, DivergenceMode, Slot, StepChoice, StepOracle, Value};
pub use pool::PoolSearch;
pub use residue::{ResidueExceptionTable, TableError};
pub use stats::SearchStats;

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::info;

/// Search strategy and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Single path with a residue exception table.
    Greedy {
        /// Residues where DECREASE is skipped
        table: ResidueExceptionTable,
    },
    /// Lookahead window of 2^lookahead slots.
    Beam {
        /// Lookahead depth N
        lookahead: u32,
    },
    /// Pool capped at `paths` candidates.
    Pool {
        /// Pool cap
        paths: usize,
    },
}

impl Strategy {
    /// Short name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Greedy { .. } => "greedy",
            Strategy::Beam { .. } => "beam",
            Strategy::Pool { .. } => "pool",
        }
    }
}

/// Configuration for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Target number of forward steps to reach 1
    pub delay: usize,

    /// Strategy used to choose predecessors
    pub strategy: Strategy,

    /// How odd steps are counted
    pub convention: Convention,

    /// Re-check the result against the forward map
    pub verify: bool,
}

impl SearchConfig {
    /// Greedy search with the default mod-729 table.
    pub fn greedy(delay: usize) -> Self {
        Self::with_strategy(
            delay,
            Strategy::Greedy {
                table: ResidueExceptionTable::default(),
            },
        )
    }

    /// Greedy search with a custom exception table.
    pub fn greedy_with_residues(
        delay: usize,
        modulus: u32,
        residues: impl IntoIterator<Item = u32>,
    ) -> Result<Self, SearchError> {
        let table = ResidueExceptionTable::from_residues(modulus, residues)?;
        Ok(Self::with_strategy(delay, Strategy::Greedy { table }))
    }

    /// Beam search with lookahead depth `lookahead`.
    pub fn beam(delay: usize, lookahead: u32) -> Self {
        Self::with_strategy(delay, Strategy::Beam { lookahead })
    }

    /// Pool search capped at `paths` candidates.
    pub fn pool(delay: usize, paths: usize) -> Self {
        Self::with_strategy(delay, Strategy::Pool { paths })
    }

    fn with_strategy(delay: usize, strategy: Strategy) -> Self {
        Self {
            delay,
            strategy,
            convention: Convention::default(),
            verify: true,
        }
    }

    /// Use a different step-counting convention.
    pub fn with_convention(mut self, convention: Convention) -> Self {
        self.convention = convention;
        self
    }

    /// Check the parameters without searching.
    pub fn validate(&self) -> Result<(), SearchError> {
        match self.strategy {
            Strategy::Greedy { .. } => check_delay(self.delay),
            Strategy::Beam { lookahead } => check_lookahead(self.delay, lookahead),
            Strategy::Pool { paths } => {
                check_delay(self.delay)?;
                if paths == 0 {
                    return Err(SearchError::ZeroPaths);
                }
                Ok(())
            }
        }
    }

    /// Slots the search window holds at its widest.
    pub fn window_slots(&self) -> usize {
        match self.strategy {
            Strategy::Greedy { .. } => 1,
            Strategy::Beam { lookahead } => 1usize.checked_shl(lookahead).unwrap_or(usize::MAX),
            Strategy::Pool { paths } => paths.saturating_mul(2),
        }
    }
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Strategy that produced the result
    pub strategy: &'static str,

    /// The constructed value and its path
    pub construction: Construction,

    /// Window statistics (beam and pool only)
    pub stats: Option<SearchStats>,

    /// Wall-clock time spent searching
    pub elapsed: Duration,
}

impl SearchReport {
    /// INCREASE steps taken.
    pub fn ups(&self) -> usize {
        self.construction.ups()
    }

    /// DECREASE steps taken.
    pub fn downs(&self) -> usize {
        self.construction.downs()
    }
}

/// Errors that can occur configuring or running a search
#[derive(Error, Debug)]
pub enum SearchError {
    /// Delay too short for the warm-up and the relaxed tail
    #[error("delay {delay} is shorter than the minimum {min}")]
    DelayTooShort {
        /// Requested delay
        delay: usize,
        /// Minimum supported delay
        min: usize,
    },

    /// Lookahead depth must be positive
    #[error("lookahead depth must be at least 1")]
    ZeroLookahead,

    /// Lookahead leaves no room for the warm-up and tail
    #[error("lookahead {lookahead} too deep for delay {delay} (need lookahead + 4 < delay)")]
    LookaheadTooDeep {
        /// Requested lookahead depth
        lookahead: u32,
        /// Requested delay
        delay: usize,
    },

    /// 2^lookahead slots cannot be addressed
    #[error("lookahead {lookahead} exceeds the addressable window (max {max})")]
    LookaheadExceedsAddressSpace {
        /// Requested lookahead depth
        lookahead: u32,
        /// Largest supported depth
        max: u32,
    },

    /// The window fits in the address space but could not be allocated
    #[error("could not allocate a window of 2^{lookahead} slots")]
    WindowAllocationFailed {
        /// Requested lookahead depth
        lookahead: u32,
    },

    /// Pool cap must be positive
    #[error("pool must hold at least one path")]
    ZeroPaths,

    /// Every branch of the window died
    #[error("no live branch remained in the search window")]
    NoLiveBranch,

    /// Result does not reach 1 in the requested number of steps
    #[error("verification failed: expected delay {expected}, forward map took {actual} steps")]
    VerificationFailed {
        /// Requested delay
        expected: usize,
        /// Steps observed (capped at expected + 1)
        actual: usize,
    },

    /// Custom residue table rejected
    #[error("invalid residue table: {0}")]
    InvalidTable(#[from] TableError),
}

/// Largest lookahead whose 2^N-slot window stays within `isize::MAX` bytes.
pub const MAX_LOOKAHEAD: u32 = (isize::MAX as usize / std::mem::size_of::<Slot>()).ilog2();

pub(crate) fn check_delay(delay: usize) -> Result<(), SearchError> {
    if delay < MIN_DELAY {
        return Err(SearchError::DelayTooShort {
            delay,
            min: MIN_DELAY,
        });
    }
    Ok(())
}

pub(crate) fn check_lookahead(delay: usize, lookahead: u32) -> Result<(), SearchError> {
    check_delay(delay)?;
    if lookahead == 0 {
        return Err(SearchError::ZeroLookahead);
    }
    if lookahead > MAX_LOOKAHEAD {
        return Err(SearchError::LookaheadExceedsAddressSpace {
            lookahead,
            max: MAX_LOOKAHEAD,
        });
    }
    // Warm-up, the initial tree and the tail must all fit in the delay
    if lookahead as usize + MIN_DELAY > delay {
        return Err(SearchError::LookaheadTooDeep { lookahead, delay });
    }
    Ok(())
}

/// Runs one configured search.
#[derive(Debug)]
pub struct DelaySearcher {
    config: SearchConfig,
}

impl DelaySearcher {
    /// Create a searcher.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Validate, search and (if configured) verify.
    pub fn run(&self) -> Result<SearchReport, SearchError> {
        self.config.validate()?;

        let oracle = StepOracle::new(self.config.convention);
        let delay = self.config.delay;
        let started = Instant::now();

        let (construction, stats) = match &self.config.strategy {
            Strategy::Greedy { table } => {
                (GreedyBuilder::new(oracle, table.clone()).build(delay)?, None)
            }
            Strategy::Beam { lookahead } => {
                let (construction, stats) =
                    BeamSearchEngine::new(oracle, *lookahead).search_with_stats(delay)?;
                (construction, Some(stats))
            }
            Strategy::Pool { paths } => {
                let (construction, stats) =
                    PoolSearch::new(oracle, *paths).search_with_stats(delay)?;
                (construction, Some(stats))
            }
        };
        let elapsed = started.elapsed();

        if self.config.verify && !construction.verify() {
            let actual = oracle::delay_of(construction.value(), self.config.convention)
                .unwrap_or_default();
            return Err(SearchError::VerificationFailed {
                expected: delay,
                actual,
            });
        }

        info!(
            strategy = self.config.strategy.name(),
            delay,
            bits = construction.value().bits(),
            ups = construction.ups(),
            downs = construction.downs(),
            elapsed = ?elapsed,
            "search finished"
        );

        Ok(SearchReport {
            strategy: self.config.strategy.name(),
            construction,
            stats,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(SearchConfig::greedy(5).validate().is_ok());
        assert!(matches!(
            SearchConfig::greedy(4).validate(),
            Err(SearchError::DelayTooShort { delay: 4, min: 5 })
        ));
        assert!(SearchConfig::beam(6, 1).validate().is_ok());
        assert!(matches!(
            SearchConfig::beam(10, 6).validate(),
            Err(SearchError::LookaheadTooDeep { .. })
        ));
        assert!(SearchConfig::beam(11, 6).validate().is_ok());
        assert!(matches!(
            SearchConfig::pool(10, 0).validate(),
            Err(SearchError::ZeroPaths)
        ));
    }

    #[test]
    fn test_window_slots() {
        assert_eq!(SearchConfig::greedy(10).window_slots(), 1);
        assert_eq!(SearchConfig::beam(100, 10).window_slots(), 1024);
        assert_eq!(SearchConfig::pool(100, 500).window_slots(), 1000);
    }

    #[test]
    fn test_lookahead_bound_accounts_for_slot_size() {
        let max_slots = isize::MAX as usize / std::mem::size_of::<Slot>();
        assert!(1usize << MAX_LOOKAHEAD <= max_slots);
        assert!(SearchConfig::beam(100, MAX_LOOKAHEAD).validate().is_ok());

        let config = SearchConfig::beam(100, 60);
        assert!(matches!(
            config.validate(),
            Err(SearchError::LookaheadExceedsAddressSpace { lookahead: 60, .. })
        ));
        assert!(matches!(
            DelaySearcher::new(config).run(),
            Err(SearchError::LookaheadExceedsAddressSpace { lookahead: 60, .. })
        ));
    }

    #[test]
    fn test_custom_residue_table() {
        let config = SearchConfig::greedy_with_residues(100, 27, [2, 11]).unwrap();
        assert_eq!(DelaySearcher::new(config).run().unwrap().construction.len(), 100);

        assert!(matches!(
            SearchConfig::greedy_with_residues(100, 28, [2]),
            Err(SearchError::InvalidTable(TableError::NotPowerOfThree(28)))
        ));
        assert!(matches!(
            SearchConfig::greedy_with_residues(100, 27, [27]),
            Err(SearchError::InvalidTable(TableError::ResidueOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_run_reports_counts() {
        let report = DelaySearcher::new(SearchConfig::greedy(5)).run().unwrap();
        assert_eq!(report.strategy, "greedy");
        assert_eq!(report.ups(), 3);
        assert_eq!(report.downs(), 2);
        assert!(report.stats.is_none());

        let report = DelaySearcher::new(SearchConfig::pool(30, 8)).run().unwrap();
        assert_eq!(report.ups() + report.downs(), 30);
        assert!(report.stats.is_some());
    }
}
