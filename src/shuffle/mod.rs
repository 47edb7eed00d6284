//! The anonymous-broadcast shuffle protocol surface
//!
//! Each party computes its power vector locally ([`compute_powers`]), folds
//! it into the shared accumulator under the exclusion barrier
//! ([`SumAccumulator::fold`]), and once all parties have folded, the final
//! sums are handed to [`solve`] to recover the unordered multiset of
//! messages.

mod accumulator;
mod power;
mod solver;

pub use accumulator::*;
pub use power::*;
pub use solver::*;
