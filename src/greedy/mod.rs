//! Single-path greedy construction
//!
//! At each backward step take DECREASE whenever the oracle allows it and the
//! residue table does not veto it, otherwise INCREASE. Cheap and myopic:
//! a locally smaller choice can force a long run of INCREASEs later.

use tracing::debug;

use crate::construction::{Construction, TAIL_STEPS, WARM_UP_STEPS};
use crate::oracle::{DivergenceMode, StepChoice, StepOracle, Value};
use crate::residue::ResidueExceptionTable;
use crate::{check_delay, SearchError};

/// Greedy backward builder.
#[derive(Debug, Clone)]
pub struct GreedyBuilder {
    oracle: StepOracle,
    table: ResidueExceptionTable,
}

impl GreedyBuilder {
    /// Builder with an explicit exception table.
    pub fn new(oracle: StepOracle, table: ResidueExceptionTable) -> Self {
        Self { oracle, table }
    }

    /// Build a construction of exactly `delay` steps.
    ///
    /// Only fails when `delay` is too short for the warm-up and tail.
    #[tracing::instrument(skip_all, name = "GreedyBuilder.build", fields(delay = delay))]
    pub fn build(&self, delay: usize) -> Result<Construction, SearchError> {
        check_delay(delay)?;

        let mut construction = Construction::warm_up(self.oracle.convention());

        for _ in 0..delay - WARM_UP_STEPS - TAIL_STEPS {
            let current = construction.value();
            let decrease = if self.table.vetoes(current) {
                None
            } else {
                self.oracle.decrease(current, DivergenceMode::Strict)
            };
            self.commit(&mut construction, decrease);
        }

        // Too close to the end for a forced run of INCREASEs to matter
        for _ in 0..TAIL_STEPS {
            let decrease = self
                .oracle
                .decrease(construction.value(), DivergenceMode::Relaxed);
            self.commit(&mut construction, decrease);
        }

        debug!(
            ups = construction.ups(),
            downs = construction.downs(),
            bits = construction.value().bits(),
            "greedy construction complete"
        );
        Ok(construction)
    }

    fn commit(&self, construction: &mut Construction, decrease: Option<Value>) {
        match decrease {
            Some(value) => construction.push(StepChoice::Decrease, value),
            None => {
                let value = self.oracle.increase(construction.value());
                construction.push(StepChoice::Increase, value);
            }
        }
    }
}
