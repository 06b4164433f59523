//! Policies: anything that maps a state to an applicable action.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::problem::Problem;

/// A decision rule over a problem's states.
///
/// `choose` is only invoked on states with at least one applicable action
/// (callers test `terminal`/`dead_end` first) and must return an applicable
/// index. Policies take `&mut self` so that stateful planners can implement
/// the same trait as memoryless base policies.
pub trait Policy<P: Problem> {
    fn choose(&mut self, problem: &P, s: &P::State, rng: &mut ChaCha8Rng) -> usize;

    /// Short name for reports and log events.
    fn name(&self) -> &str;
}

/// Uniform choice over applicable actions.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

impl<P: Problem> Policy<P> for RandomPolicy {
    fn choose(&mut self, problem: &P, s: &P::State, rng: &mut ChaCha8Rng) -> usize {
        let n = problem.number_actions(s);
        let applicable: Vec<usize> = (0..n).filter(|&a| problem.applicable(s, a)).collect();
        assert!(
            !applicable.is_empty(),
            "random policy asked for an action in a state with none applicable: {:?}",
            s
        );
        applicable[rng.gen_range(0..applicable.len())]
    }

    fn name(&self) -> &str {
        "random"
    }
}
