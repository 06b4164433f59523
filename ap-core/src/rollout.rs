//! Monte-Carlo rollout evaluation of a policy.

use rand_chacha::ChaCha8Rng;

use crate::policy::Policy;
use crate::problem::Problem;

/// Mean discounted cost of `trials` rollouts of `policy` from `start`, each
/// of at most `depth` steps.
///
/// A rollout stops at a terminal state, at a dead end (adding the problem's
/// dead-end value), or when the step budget runs out.
pub fn evaluation<P: Problem, B: Policy<P>>(
    problem: &P,
    policy: &mut B,
    start: &P::State,
    trials: u32,
    depth: u16,
    rng: &mut ChaCha8Rng,
) -> f64 {
    assert!(trials > 0, "rollout evaluation needs at least one trial");
    let mut total = 0.0;
    for _ in 0..trials {
        total += single_rollout(problem, policy, start, depth, rng);
    }
    total / trials as f64
}

fn single_rollout<P: Problem, B: Policy<P>>(
    problem: &P,
    policy: &mut B,
    start: &P::State,
    depth: u16,
    rng: &mut ChaCha8Rng,
) -> f64 {
    let mut s = start.clone();
    let mut cost = 0.0;
    let mut df = 1.0;
    for _ in 0..depth {
        if problem.terminal(&s) {
            break;
        }
        if problem.dead_end(&s) {
            cost += df * problem.dead_end_value();
            break;
        }
        let a = policy.choose(problem, &s, rng);
        debug_assert!(problem.applicable(&s, a));
        cost += df * problem.cost(&s, a);
        s = problem.sample(&s, a, rng);
        df *= problem.discount();
    }
    cost
}
