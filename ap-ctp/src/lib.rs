//! ap-ctp: the Canadian Traveler Problem.
//!
//! A traveler crosses a road map whose edges may turn out blocked; each
//! edge's status is revealed on reaching an endpoint. The belief-level
//! problem enumerates joint outcomes over the unknown edges at the
//! destination, while [`CtpWorld`] plays out one sampled weather for
//! evaluation.

pub mod graph;
pub mod greedy;
pub mod problem;
pub mod state;

pub use graph::{min_distances, Edge, Graph, GraphError, MAX_EDGES};
pub use greedy::GreedyPolicy;
pub use problem::{CtpProblem, CtpWorld, DEFAULT_DEAD_END_VALUE};
pub use state::{probability_bad_weather, sample_weather, BeliefState, Weather};

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
