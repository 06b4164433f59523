//! Small deterministic problems for engine tests.

use ap_core::{Policy, Problem};
use rand_chacha::ChaCha8Rng;

/// Line 0 -> 1 -> ... -> `len`, one unit-cost action per state.
pub struct Chain {
    pub len: u8,
}

impl Problem for Chain {
    type State = u8;

    fn number_actions(&self, _s: &u8) -> usize {
        1
    }
    fn applicable(&self, _s: &u8, a: usize) -> bool {
        a == 0
    }
    fn cost(&self, _s: &u8, _a: usize) -> f64 {
        1.0
    }
    fn next(&self, s: &u8, _a: usize) -> Vec<(u8, f64)> {
        vec![(s + 1, 1.0)]
    }
    fn terminal(&self, s: &u8) -> bool {
        *s == self.len
    }
    fn dead_end(&self, _s: &u8) -> bool {
        false
    }
    fn dead_end_value(&self) -> f64 {
        1000.0
    }
    fn discount(&self) -> f64 {
        1.0
    }
    fn init(&self) -> u8 {
        0
    }
}

/// Two deterministic routes to the goal: 0 -(1)-> 1 -(1)-> 3 against
/// 0 -(2)-> 2 -(1)-> 3. The left branch costs 2 in total, the right 3.
pub struct Diamond;

impl Problem for Diamond {
    type State = u8;

    fn number_actions(&self, s: &u8) -> usize {
        if *s == 0 {
            2
        } else {
            1
        }
    }
    fn applicable(&self, s: &u8, a: usize) -> bool {
        a < self.number_actions(s)
    }
    fn cost(&self, s: &u8, a: usize) -> f64 {
        match (*s, a) {
            (0, 0) => 1.0,
            (0, 1) => 2.0,
            _ => 1.0,
        }
    }
    fn next(&self, s: &u8, a: usize) -> Vec<(u8, f64)> {
        let s2 = match (*s, a) {
            (0, 0) => 1,
            (0, 1) => 2,
            (1, _) | (2, _) => 3,
            _ => panic!("next on terminal state"),
        };
        vec![(s2, 1.0)]
    }
    fn terminal(&self, s: &u8) -> bool {
        *s == 3
    }
    fn dead_end(&self, _s: &u8) -> bool {
        false
    }
    fn dead_end_value(&self) -> f64 {
        1000.0
    }
    fn discount(&self) -> f64 {
        1.0
    }
    fn init(&self) -> u8 {
        0
    }
}

/// Single self-looping action; state 0 is a dead end.
pub struct TrapAtRoot;

impl Problem for TrapAtRoot {
    type State = u8;

    fn number_actions(&self, _s: &u8) -> usize {
        1
    }
    fn applicable(&self, _s: &u8, a: usize) -> bool {
        a == 0
    }
    fn cost(&self, _s: &u8, _a: usize) -> f64 {
        1.0
    }
    fn next(&self, s: &u8, _a: usize) -> Vec<(u8, f64)> {
        vec![(*s, 1.0)]
    }
    fn terminal(&self, _s: &u8) -> bool {
        false
    }
    fn dead_end(&self, s: &u8) -> bool {
        *s == 0
    }
    fn dead_end_value(&self) -> f64 {
        250.0
    }
    fn discount(&self) -> f64 {
        1.0
    }
    fn init(&self) -> u8 {
        0
    }
}

/// Always picks `preferred` when applicable, otherwise the lowest applicable
/// index.
#[derive(Clone, Copy)]
pub struct FixedPolicy {
    pub preferred: usize,
}

impl<P: Problem> Policy<P> for FixedPolicy {
    fn choose(&mut self, problem: &P, s: &P::State, _rng: &mut ChaCha8Rng) -> usize {
        if problem.applicable(s, self.preferred) {
            return self.preferred;
        }
        let n = problem.number_actions(s);
        (0..n)
            .find(|&a| problem.applicable(s, a))
            .expect("fixed policy asked for an action with none applicable")
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
