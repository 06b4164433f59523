//! ap-eval: episode-level evaluation of policies against sampled instances.
//!
//! Each trial draws a hidden instance through the domain's world model, then
//! plays the policy step by step under the true dynamics while the policy
//! only ever sees its belief state. Per-trial seeds are derived from the base
//! seed, so different policies evaluated with the same options face the same
//! sequence of hidden instances.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ap_core::{Policy, Problem, WorldModel};
use ap_logging::{ts_ms, EvalSummaryEventV1, TrialEventV1};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy)]
pub struct EvalOptions {
    /// Episodes to run.
    pub trials: u32,
    /// Step budget per episode.
    pub depth: u16,
    /// Base seed for per-trial seed derivation.
    pub seed: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct TrialRecord {
    pub trial: u32,
    pub cost: f64,
    pub steps: u32,
    pub reached_goal: bool,
}

#[derive(Debug, Clone)]
pub struct EvalReport {
    pub policy: String,
    pub trials: u32,
    pub depth: u16,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Episodes that never attained the goal within the step budget.
    pub unreachable: u32,
    pub records: Vec<TrialRecord>,
}

impl EvalReport {
    pub fn summary_event(&self, run_id: &str, domain: &str) -> EvalSummaryEventV1 {
        EvalSummaryEventV1 {
            event: "eval_summary",
            ts_ms: ts_ms(),
            run_id: run_id.to_string(),
            domain: domain.to_string(),
            policy: self.policy.clone(),
            trials: self.trials,
            depth: self.depth,
            mean: self.mean,
            std_dev: self.std_dev,
            min: self.min,
            max: self.max,
            unreachable: self.unreachable,
        }
    }

    pub fn trial_event(&self, record: &TrialRecord, run_id: &str, domain: &str) -> TrialEventV1 {
        TrialEventV1 {
            event: "trial",
            ts_ms: ts_ms(),
            run_id: run_id.to_string(),
            domain: domain.to_string(),
            policy: self.policy.clone(),
            trial: record.trial,
            cost: record.cost,
            steps: record.steps,
            reached_goal: record.reached_goal,
        }
    }
}

/// SplitMix64: decorrelates per-trial seeds derived from a base seed.
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Run `opts.trials` episodes of `policy` and aggregate discounted costs.
///
/// An episode ends at a terminal state, at a dead end (charging the
/// problem's dead-end value), or when the step budget runs out. Episodes that
/// never reach the goal count as `unreachable`.
pub fn evaluate_policy<P, W, B>(
    problem: &P,
    world: &mut W,
    policy: &mut B,
    opts: &EvalOptions,
) -> EvalReport
where
    P: Problem,
    W: WorldModel<P>,
    B: Policy<P>,
{
    assert!(opts.trials > 0, "evaluation needs at least one trial");
    let mut records = Vec::with_capacity(opts.trials as usize);
    let mut unreachable = 0u32;

    for trial in 0..opts.trials {
        let mut rng = ChaCha8Rng::seed_from_u64(splitmix64(opts.seed ^ trial as u64));
        let mut s = world.reset(&mut rng);
        let mut cost = 0.0;
        let mut discount = 1.0;
        let mut steps = 0u32;

        for _ in 0..opts.depth {
            if problem.terminal(&s) {
                break;
            }
            if problem.dead_end(&s) {
                cost += discount * problem.dead_end_value();
                break;
            }
            let a = policy.choose(problem, &s, &mut rng);
            debug_assert!(problem.applicable(&s, a));
            cost += discount * problem.cost(&s, a);
            s = world.step(&s, a, &mut rng);
            discount *= problem.discount();
            steps += 1;
        }

        let reached_goal = problem.terminal(&s);
        if !reached_goal {
            unreachable += 1;
        }
        records.push(TrialRecord {
            trial,
            cost,
            steps,
            reached_goal,
        });
    }

    let n = records.len() as f64;
    let mean = records.iter().map(|r| r.cost).sum::<f64>() / n;
    let var = records.iter().map(|r| (r.cost - mean).powi(2)).sum::<f64>() / n;
    let min = records.iter().map(|r| r.cost).fold(f64::INFINITY, f64::min);
    let max = records
        .iter()
        .map(|r| r.cost)
        .fold(f64::NEG_INFINITY, f64::max);

    EvalReport {
        policy: policy.name().to_string(),
        trials: opts.trials,
        depth: opts.depth,
        mean,
        std_dev: var.sqrt(),
        min,
        max,
        unreachable,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_core::RandomPolicy;

    /// Chain 0 -> `len`, unit costs; the world model mirrors the problem.
    struct Chain {
        len: u8,
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

    struct ChainWorld;

    impl WorldModel<Chain> for ChainWorld {
        fn reset(&mut self, _rng: &mut ChaCha8Rng) -> u8 {
            0
        }
        fn step(&mut self, s: &u8, _a: usize, _rng: &mut ChaCha8Rng) -> u8 {
            s + 1
        }
    }

    #[test]
    fn deterministic_chain_reports_exact_costs() {
        let problem = Chain { len: 3 };
        let opts = EvalOptions {
            trials: 8,
            depth: 16,
            seed: 0,
        };
        let report = evaluate_policy(&problem, &mut ChainWorld, &mut RandomPolicy, &opts);
        assert_eq!(report.trials, 8);
        assert_eq!(report.unreachable, 0);
        assert!((report.mean - 3.0).abs() < 1e-12);
        assert_eq!(report.std_dev, 0.0);
        assert_eq!(report.min, 3.0);
        assert_eq!(report.max, 3.0);
        assert!(report.records.iter().all(|r| r.reached_goal && r.steps == 3));
    }

    #[test]
    fn step_budget_marks_episodes_unreachable() {
        let problem = Chain { len: 10 };
        let opts = EvalOptions {
            trials: 4,
            depth: 5,
            seed: 0,
        };
        let report = evaluate_policy(&problem, &mut ChainWorld, &mut RandomPolicy, &opts);
        assert_eq!(report.unreachable, 4);
        assert!((report.mean - 5.0).abs() < 1e-12);
    }

    #[test]
    fn same_options_reproduce_the_same_report() {
        let problem = Chain { len: 4 };
        let opts = EvalOptions {
            trials: 6,
            depth: 16,
            seed: 42,
        };
        let a = evaluate_policy(&problem, &mut ChainWorld, &mut RandomPolicy, &opts);
        let b = evaluate_policy(&problem, &mut ChainWorld, &mut RandomPolicy, &opts);
        assert_eq!(a.mean, b.mean);
        assert_eq!(a.unreachable, b.unreachable);
        assert_eq!(a.records.len(), b.records.len());
    }

    #[test]
    fn splitmix_decorrelates_consecutive_seeds() {
        let a = splitmix64(0);
        let b = splitmix64(1);
        assert_ne!(a, b);
        assert_ne!(a ^ b, 1);
    }

    #[test]
    fn report_converts_to_log_events() {
        let problem = Chain { len: 2 };
        let opts = EvalOptions {
            trials: 2,
            depth: 8,
            seed: 0,
        };
        let report = evaluate_policy(&problem, &mut ChainWorld, &mut RandomPolicy, &opts);
        let summary = report.summary_event("run-1", "chain");
        assert_eq!(summary.policy, "random");
        assert_eq!(summary.trials, 2);
        let trial = report.trial_event(&report.records[0], "run-1", "chain");
        assert_eq!(trial.trial, 0);
        assert!(trial.reached_goal);
    }
}
