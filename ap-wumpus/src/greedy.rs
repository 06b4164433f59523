//! Cautious gold-seeking base policy.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;

use ap_core::Policy;

use crate::belief::{adjacent_mask, target_cell, BeliefState, Gold, Heading};
use crate::problem::{WumpusProblem, EXIT, GRAB, MOVE_FORWARD, TURN_LEFT, TURN_RIGHT};

/// Heads for the nearest cell that may hold the gold, moving only through
/// cells no possible world marks hazardous; with the gold in hand it returns
/// to the entrance and exits. When no safe route exists it pushes forward if
/// the cell ahead is certainly safe, otherwise turns in place.
#[derive(Clone, Copy, Default)]
pub struct WumpusGreedyPolicy;

impl Policy<WumpusProblem> for WumpusGreedyPolicy {
    fn choose(&mut self, problem: &WumpusProblem, s: &BeliefState, _rng: &mut ChaCha8Rng) -> usize {
        debug_assert!(s.pos >= 0, "policy queried outside the cave");
        let pos = s.pos as u8;

        if s.gold == Gold::Held {
            if pos == 0 {
                return EXIT;
            }
            return self
                .step_toward(problem, s, 1u16)
                .unwrap_or_else(|| self.fallback(problem, s));
        }
        if s.gold == Gold::At(pos) {
            return GRAB;
        }
        let targets = match s.gold {
            Gold::At(c) => 1u16 << c,
            _ => s.possible_gold,
        };
        self.step_toward(problem, s, targets)
            .unwrap_or_else(|| self.fallback(problem, s))
    }

    fn name(&self) -> &str {
        "greedy"
    }
}

impl WumpusGreedyPolicy {
    fn certainly_safe(&self, s: &BeliefState) -> u16 {
        let mut hazardous = 0u16;
        for w in &s.worlds {
            hazardous |= w.pits | w.wumpus;
        }
        !hazardous
    }

    /// First action of a shortest safe route to any target cell, or `None`
    /// when no target is safely reachable.
    fn step_toward(&self, problem: &WumpusProblem, s: &BeliefState, targets: u16) -> Option<usize> {
        let pos = s.pos as u8;
        let safe = self.certainly_safe(s);
        let targets = targets & safe & !(1u16 << pos);
        if targets == 0 {
            return None;
        }

        let ncells = problem.ncells();
        let mut prev = vec![u8::MAX; ncells];
        let mut seen = 1u16 << pos;
        let mut queue = VecDeque::new();
        queue.push_back(pos);
        let mut found = None;
        'search: while let Some(c) = queue.pop_front() {
            let neighbors = adjacent_mask(c, problem.rows(), problem.cols());
            for d in 0..ncells as u8 {
                if neighbors & (1 << d) == 0 || seen & (1 << d) != 0 || safe & (1 << d) == 0 {
                    continue;
                }
                seen |= 1 << d;
                prev[d as usize] = c;
                if targets & (1 << d) != 0 {
                    found = Some(d);
                    break 'search;
                }
                queue.push_back(d);
            }
        }

        let mut step = found?;
        while prev[step as usize] != pos {
            step = prev[step as usize];
        }
        Some(self.toward(problem, s, step))
    }

    fn toward(&self, problem: &WumpusProblem, s: &BeliefState, cell: u8) -> usize {
        let pos = s.pos as u8;
        let diff = cell as i16 - pos as i16;
        let desired = if diff == problem.cols() as i16 {
            Heading::North
        } else if diff == -(problem.cols() as i16) {
            Heading::South
        } else if diff == 1 {
            Heading::East
        } else {
            debug_assert_eq!(diff, -1);
            Heading::West
        };
        match (desired as u8 + 4 - s.heading as u8) & 0x3 {
            0 => MOVE_FORWARD,
            1 | 2 => TURN_RIGHT,
            _ => TURN_LEFT,
        }
    }

    fn fallback(&self, problem: &WumpusProblem, s: &BeliefState) -> usize {
        let pos = s.pos as u8;
        let ahead = target_cell(pos, s.heading, problem.rows(), problem.cols());
        if ahead != pos && self.certainly_safe(s) & (1 << ahead) != 0 {
            MOVE_FORWARD
        } else {
            TURN_RIGHT
        }
    }
}
