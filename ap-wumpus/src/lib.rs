//! ap-wumpus: a partially-observable gold hunt.
//!
//! The agent explores a small cave holding an exact belief: the list of
//! hazard placements consistent with every breeze/stench percept so far, plus
//! the cells that may still hold the gold. Stepping into a cell resolves
//! survival, the percept, and the glitter in one stochastic transition.

pub mod belief;
pub mod greedy;
pub mod problem;

pub use belief::{
    adjacent_mask, enumerate_placements, target_cell, BeliefState, Gold, Heading, World,
    MAX_CELLS, OUTSIDE_CAVE,
};
pub use greedy::WumpusGreedyPolicy;
pub use problem::{
    WumpusProblem, WumpusWorld, DEFAULT_DEAD_END_VALUE, DEFAULT_DISCOUNT, EXIT, GRAB,
    MOVE_FORWARD, NUM_ACTIONS, TURN_LEFT, TURN_RIGHT,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
