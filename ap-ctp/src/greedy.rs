//! Optimistic-distance greedy base policy.

use std::sync::Arc;

use rand_chacha::ChaCha8Rng;

use ap_core::{Policy, Problem};

use crate::graph::{min_distances, Graph};
use crate::problem::CtpProblem;
use crate::state::BeliefState;

/// Takes the edge minimizing edge cost plus the shortest-path distance from
/// its far end to the goal, treating unknown edges as traversable. Ties break
/// toward the lower action index.
#[derive(Clone)]
pub struct GreedyPolicy {
    graph: Arc<Graph>,
}

impl GreedyPolicy {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }
}

impl Policy<CtpProblem> for GreedyPolicy {
    fn choose(&mut self, problem: &CtpProblem, s: &BeliefState, _rng: &mut ChaCha8Rng) -> usize {
        if s.current < 0 {
            return 0;
        }
        let dist = min_distances(&self.graph, self.graph.goal(), |e| {
            !s.known(e) || s.traversable(e)
        });
        let incident = self.graph.incident(s.current as usize);
        let mut best = None;
        let mut best_score = f64::INFINITY;
        for (a, &e) in incident.iter().enumerate() {
            if !problem.applicable(s, a) {
                continue;
            }
            let score = self.graph.cost(e) + dist[self.graph.other_end(e, s.current as usize)];
            if score < best_score {
                best_score = score;
                best = Some(a);
            }
        }
        match best {
            Some(a) => a,
            // Goal optimistically unreachable: wander along any open edge.
            None => (0..incident.len())
                .find(|&a| problem.applicable(s, a))
                .expect("greedy policy asked for an action with none applicable"),
        }
    }

    fn name(&self) -> &str {
        "greedy"
    }
}
