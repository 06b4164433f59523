//! The Canadian Traveler Problem over belief states, plus the hidden-weather
//! world model used at evaluation time.

use std::sync::Arc;

use rand_chacha::ChaCha8Rng;

use ap_core::{Problem, WorldModel};

use crate::graph::{min_distances, Graph};
use crate::state::{sample_weather, BeliefState, Weather};

pub const DEFAULT_DEAD_END_VALUE: f64 = 1.0e4;

/// Belief-level CTP dynamics: moving onto a node reveals the status of every
/// unknown edge incident to it, so a move enumerates the joint outcomes over
/// those edges.
pub struct CtpProblem {
    graph: Arc<Graph>,
    dead_end_value: f64,
}

impl CtpProblem {
    pub fn new(graph: Arc<Graph>, dead_end_value: f64) -> Self {
        assert!(dead_end_value.is_finite() && dead_end_value > 0.0);
        Self {
            graph,
            dead_end_value,
        }
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Destination node of action `a` in `s`; the entry action moves onto the
    /// start node.
    fn to_node(&self, s: &BeliefState, a: usize) -> usize {
        if s.current < 0 {
            self.graph.start()
        } else {
            let e = self.graph.incident(s.current as usize)[a];
            self.graph.other_end(e, s.current as usize)
        }
    }
}

impl Problem for CtpProblem {
    type State = BeliefState;

    fn number_actions(&self, s: &BeliefState) -> usize {
        if s.current < 0 {
            1
        } else {
            self.graph.incident(s.current as usize).len()
        }
    }

    fn applicable(&self, s: &BeliefState, a: usize) -> bool {
        if s.current < 0 {
            return a == 0;
        }
        let incident = self.graph.incident(s.current as usize);
        a < incident.len() && s.traversable(incident[a])
    }

    fn cost(&self, s: &BeliefState, a: usize) -> f64 {
        if s.current < 0 {
            0.0
        } else {
            self.graph.cost(self.graph.incident(s.current as usize)[a])
        }
    }

    fn next(&self, s: &BeliefState, a: usize) -> Vec<(BeliefState, f64)> {
        let to_node = self.to_node(s, a);

        // Unknown edges incident to the destination get resolved on arrival.
        let unknown: Vec<usize> = self
            .graph
            .incident(to_node)
            .iter()
            .copied()
            .filter(|&e| !s.known(e))
            .collect();

        let k = unknown.len();
        let mut outcomes = Vec::with_capacity(1 << k);
        for subset in 0..(1u64 << k) {
            let mut next = *s;
            let mut p = 1.0;
            for (j, &e) in unknown.iter().enumerate() {
                let blocked = subset & (1 << j) != 0;
                p *= if blocked {
                    1.0 - self.graph.prob_free(e)
                } else {
                    self.graph.prob_free(e)
                };
                next.set_edge_status(e, blocked);
            }
            next.current = to_node as i32;
            if p > 0.0 {
                outcomes.push((next, p));
            }
        }
        outcomes
    }

    fn terminal(&self, s: &BeliefState) -> bool {
        s.current == self.graph.goal() as i32
    }

    fn dead_end(&self, s: &BeliefState) -> bool {
        if s.current < 0 || self.terminal(s) {
            return false;
        }
        // Optimistic reachability: unknown edges count as traversable.
        let dist = min_distances(&self.graph, s.current as usize, |e| {
            !s.known(e) || s.traversable(e)
        });
        dist[self.graph.goal()].is_infinite()
    }

    fn dead_end_value(&self) -> f64 {
        self.dead_end_value
    }

    fn discount(&self) -> f64 {
        1.0
    }

    fn init(&self) -> BeliefState {
        BeliefState::initial()
    }
}

/// Execution dynamics against one concrete weather: arriving at a node
/// reveals the true status of all its incident edges.
pub struct CtpWorld {
    graph: Arc<Graph>,
    weather: Weather,
}

impl CtpWorld {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self {
            graph,
            weather: Weather::default(),
        }
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = weather;
    }
}

impl WorldModel<CtpProblem> for CtpWorld {
    fn reset(&mut self, rng: &mut ChaCha8Rng) -> BeliefState {
        self.weather = sample_weather(&self.graph, rng);
        BeliefState::initial()
    }

    fn step(&mut self, s: &BeliefState, a: usize, _rng: &mut ChaCha8Rng) -> BeliefState {
        let to_node = if s.current < 0 {
            self.graph.start()
        } else {
            let e = self.graph.incident(s.current as usize)[a];
            self.graph.other_end(e, s.current as usize)
        };
        let mut next = *s;
        for &e in self.graph.incident(to_node) {
            next.set_edge_status(e, !self.weather.traversable(e));
        }
        next.current = to_node as i32;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use rand::SeedableRng;

    fn two_route_map() -> Arc<Graph> {
        Arc::new(
            Graph::new(
                4,
                vec![
                    Edge {
                        from: 0,
                        to: 1,
                        prob_free: 1.0,
                        cost: 1.0,
                    },
                    Edge {
                        from: 1,
                        to: 3,
                        prob_free: 0.5,
                        cost: 1.0,
                    },
                    Edge {
                        from: 0,
                        to: 2,
                        prob_free: 0.5,
                        cost: 2.0,
                    },
                    Edge {
                        from: 2,
                        to: 3,
                        prob_free: 1.0,
                        cost: 2.0,
                    },
                ],
            )
            .unwrap(),
        )
    }

    fn problem() -> CtpProblem {
        CtpProblem::new(two_route_map(), DEFAULT_DEAD_END_VALUE)
    }

    #[test]
    fn entry_move_reveals_the_start_neighborhood() {
        let p = problem();
        let init = p.init();
        assert_eq!(p.number_actions(&init), 1);
        assert!(p.applicable(&init, 0));
        assert_eq!(p.cost(&init, 0), 0.0);

        // Edges 0 and 2 are incident to the start; edge 0 is certain, edge 2
        // is a coin flip, so two outcomes.
        let outcomes = p.next(&init, 0);
        assert_eq!(outcomes.len(), 2);
        let total: f64 = outcomes.iter().map(|o| o.1).sum();
        assert!((total - 1.0).abs() < 1e-12);
        for (s, _) in &outcomes {
            assert_eq!(s.current, 0);
            assert!(s.known(0));
            assert!(s.known(2));
            assert!(!s.known(1));
            assert!(s.traversable(0));
        }
        assert!(outcomes.iter().any(|(s, _)| s.traversable(2)));
        assert!(outcomes.iter().any(|(s, _)| !s.traversable(2)));
    }

    #[test]
    fn outcome_enumeration_is_the_full_joint() {
        let p = problem();
        let mut s = p.init();
        s.current = 0;
        s.set_edge_status(0, false);
        s.set_edge_status(2, false);

        // Moving to node 1 resolves only edge 1.
        let outcomes = p.next(&s, 0);
        assert_eq!(outcomes.len(), 2);
        for (s2, prob) in &outcomes {
            assert_eq!(s2.current, 1);
            assert!(s2.known(1));
            assert_eq!(*prob, 0.5);
        }
    }

    #[test]
    fn certain_edges_drop_their_zero_probability_outcomes() {
        let g = Arc::new(
            Graph::new(
                3,
                vec![
                    Edge {
                        from: 0,
                        to: 1,
                        prob_free: 1.0,
                        cost: 1.0,
                    },
                    Edge {
                        from: 1,
                        to: 2,
                        prob_free: 1.0,
                        cost: 1.0,
                    },
                ],
            )
            .unwrap(),
        );
        let p = CtpProblem::new(g, DEFAULT_DEAD_END_VALUE);
        let outcomes = p.next(&p.init(), 0);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].1, 1.0);
    }

    #[test]
    fn blocked_edges_are_inapplicable() {
        let p = problem();
        let mut s = p.init();
        s.current = 0;
        s.set_edge_status(0, true);
        s.set_edge_status(2, false);
        assert!(!p.applicable(&s, 0));
        assert!(p.applicable(&s, 1));
    }

    #[test]
    fn dead_end_when_the_goal_is_cut_off() {
        let p = problem();
        let mut s = p.init();
        s.current = 1;
        // Both goal edges known blocked; getting back to 0 doesn't help.
        s.set_edge_status(1, true);
        s.set_edge_status(2, true);
        s.set_edge_status(0, false);
        assert!(p.dead_end(&s));

        // With edge 2 merely unknown the goal is still optimistically
        // reachable.
        let mut hopeful = s;
        hopeful.known &= !(1 << 2);
        hopeful.blocked &= !(1 << 2);
        assert!(!p.dead_end(&hopeful));
    }

    #[test]
    fn terminal_at_the_goal_node() {
        let p = problem();
        let mut s = p.init();
        s.current = 3;
        assert!(p.terminal(&s));
        assert!(!p.dead_end(&s));
    }

    #[test]
    fn world_steps_reveal_the_true_weather() {
        let graph = two_route_map();
        let mut world = CtpWorld::new(Arc::clone(&graph));
        world.set_weather(Weather { blocked: 1 << 1 });

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let s0 = world.step(&BeliefState::initial(), 0, &mut rng);
        assert_eq!(s0.current, 0);
        assert!(s0.known(0) && s0.known(2));
        assert!(s0.traversable(0) && s0.traversable(2));

        let s1 = world.step(&s0, 0, &mut rng);
        assert_eq!(s1.current, 1);
        assert!(s1.known(1));
        assert!(!s1.traversable(1));
    }

    #[test]
    fn world_reset_samples_a_weather_and_restarts() {
        let graph = two_route_map();
        let mut world = CtpWorld::new(Arc::clone(&graph));
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let s = world.reset(&mut rng);
        assert_eq!(s, BeliefState::initial());
        // Certain edges stay free in every sampled weather.
        assert!(world.weather().traversable(0));
        assert!(world.weather().traversable(3));
    }
}
