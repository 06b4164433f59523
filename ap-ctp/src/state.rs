//! Traveler belief states and sampled weathers.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::graph::{min_distances, Graph};

/// What the traveler knows: current node plus per-edge status bits. Edge `e`
/// is tracked by bit `e` of `known` and, once known, bit `e` of `blocked`.
/// `current == -1` before the first move onto the start node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeliefState {
    pub current: i32,
    pub known: u64,
    pub blocked: u64,
}

impl BeliefState {
    pub fn initial() -> Self {
        Self {
            current: -1,
            known: 0,
            blocked: 0,
        }
    }

    pub fn known(&self, e: usize) -> bool {
        self.known & (1u64 << e) != 0
    }

    /// Unknown edges count as traversable until observed otherwise.
    pub fn traversable(&self, e: usize) -> bool {
        self.blocked & (1u64 << e) == 0
    }

    pub fn set_edge_status(&mut self, e: usize, blocked: bool) {
        self.known |= 1u64 << e;
        if blocked {
            self.blocked |= 1u64 << e;
        } else {
            self.blocked &= !(1u64 << e);
        }
    }
}

/// A fully resolved status assignment for every edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Weather {
    pub blocked: u64,
}

impl Weather {
    pub fn traversable(&self, e: usize) -> bool {
        self.blocked & (1u64 << e) == 0
    }
}

/// Draw each edge's status independently from its `prob_free`.
pub fn sample_weather(graph: &Graph, rng: &mut ChaCha8Rng) -> Weather {
    let mut blocked = 0u64;
    for e in 0..graph.num_edges() {
        if rng.gen::<f64>() >= graph.prob_free(e) {
            blocked |= 1u64 << e;
        }
    }
    Weather { blocked }
}

/// Fraction of sampled weathers under which the goal is unreachable from the
/// start.
pub fn probability_bad_weather(graph: &Graph, nsamples: u32, rng: &mut ChaCha8Rng) -> f64 {
    assert!(nsamples > 0);
    let mut bad = 0u32;
    for _ in 0..nsamples {
        let weather = sample_weather(graph, rng);
        let dist = min_distances(graph, graph.start(), |e| weather.traversable(e));
        if dist[graph.goal()].is_infinite() {
            bad += 1;
        }
    }
    bad as f64 / nsamples as f64
}
