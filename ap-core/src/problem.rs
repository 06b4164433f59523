//! The stochastic shortest-path problem surface consumed by planners.

use std::fmt;
use std::hash::Hash;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// A finite-action stochastic decision process with non-negative costs.
///
/// Actions are dense indices `0..number_actions(s)`; not every index is
/// applicable in every state. Calling `cost`/`next` on an inapplicable action
/// is a contract violation, not a recoverable error: callers filter by
/// [`Problem::applicable`] first.
pub trait Problem {
    type State: Clone + Eq + Hash + fmt::Debug;

    /// Number of action indices in `s` (applicable or not).
    fn number_actions(&self, s: &Self::State) -> usize;

    fn applicable(&self, s: &Self::State, a: usize) -> bool;

    /// Immediate cost of `a` in `s`. Non-negative and finite.
    fn cost(&self, s: &Self::State, a: usize) -> f64;

    /// Full support of the transition distribution: distinct successor states
    /// with strictly positive probabilities summing to 1.
    fn next(&self, s: &Self::State, a: usize) -> Vec<(Self::State, f64)>;

    /// Draw one successor according to the `next` distribution.
    fn sample(&self, s: &Self::State, a: usize, rng: &mut ChaCha8Rng) -> Self::State {
        let outcomes = self.next(s, a);
        debug_assert!(!outcomes.is_empty(), "sample on action with empty support");
        let mut r = rng.gen::<f64>();
        let last = outcomes.len() - 1;
        for (i, (s2, p)) in outcomes.into_iter().enumerate() {
            r -= p;
            if r <= 0.0 || i == last {
                return s2;
            }
        }
        unreachable!("transition probabilities sum below 1");
    }

    /// Goal predicate. A terminal state has value 0.
    fn terminal(&self, s: &Self::State) -> bool;

    /// A state from which the goal is unattainable. Disjoint from `terminal`.
    fn dead_end(&self, s: &Self::State) -> bool;

    /// Cost charged for reaching a dead end. Finite; caps otherwise unbounded
    /// values when `discount() == 1`.
    fn dead_end_value(&self) -> f64;

    /// Discount factor in (0, 1].
    fn discount(&self) -> f64;

    /// Initial state.
    fn init(&self) -> Self::State;
}

/// Execution-time dynamics for evaluating a policy against a sampled hidden
/// instance (a weather, a cave layout). The planning [`Problem`] supplies
/// costs and termination; the world model supplies the true transitions.
pub trait WorldModel<P: Problem> {
    /// Sample a fresh hidden instance and return the initial state under it.
    fn reset(&mut self, rng: &mut ChaCha8Rng) -> P::State;

    /// Advance `s` by `a` under the hidden instance.
    fn step(&mut self, s: &P::State, a: usize, rng: &mut ChaCha8Rng) -> P::State;
}
