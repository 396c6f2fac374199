//! Lookahead beam search
//!
//! [`BeamTree`] holds the 2^N-slot window; [`BeamSearchEngine`] drives it.
//! Cost in time and memory is proportional to 2^N times the size of the
//! values, which grows linearly with the delay.

mod engine;
mod tree;

pub use engine::BeamSearchEngine;
pub use tree::BeamTree;
