//! Belief-MDP dynamics for the cave, and the hidden-world model used at
//! evaluation time.
//!
//! Moving into a cell resolves three things at once: whether the agent
//! survives, the breeze/stench percept, and whether the gold glitters there.
//! `next` partitions the possible worlds accordingly, so each outcome is the
//! belief the agent would actually hold after that percept.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use ap_core::{Problem, WorldModel};

use crate::belief::{
    adjacent_mask, enumerate_placements, target_cell, BeliefState, Gold, Heading, World,
    MAX_CELLS, OUTSIDE_CAVE,
};

pub const MOVE_FORWARD: usize = 0;
pub const TURN_RIGHT: usize = 1;
pub const TURN_LEFT: usize = 2;
pub const GRAB: usize = 3;
pub const EXIT: usize = 4;
pub const NUM_ACTIONS: usize = 5;

pub const DEFAULT_DEAD_END_VALUE: f64 = 100.0;
pub const DEFAULT_DISCOUNT: f64 = 0.95;

#[derive(Debug, Clone)]
pub struct WumpusProblem {
    rows: usize,
    cols: usize,
    npits: usize,
    nwumpus: usize,
    dead_end_value: f64,
    discount: f64,
}

pub(crate) enum MoveResolution {
    Death,
    Safe {
        breeze: bool,
        stench: bool,
        glitter: bool,
    },
}

impl WumpusProblem {
    pub fn new(rows: usize, cols: usize, npits: usize, nwumpus: usize) -> Self {
        Self::with_costs(
            rows,
            cols,
            npits,
            nwumpus,
            DEFAULT_DEAD_END_VALUE,
            DEFAULT_DISCOUNT,
        )
    }

    pub fn with_costs(
        rows: usize,
        cols: usize,
        npits: usize,
        nwumpus: usize,
        dead_end_value: f64,
        discount: f64,
    ) -> Self {
        let ncells = rows * cols;
        assert!(rows >= 1 && cols >= 1 && ncells >= 2 && ncells <= MAX_CELLS);
        assert!(npits < ncells && nwumpus < ncells);
        assert!(dead_end_value.is_finite() && dead_end_value > 0.0);
        assert!(discount > 0.0 && discount <= 1.0);
        Self {
            rows,
            cols,
            npits,
            nwumpus,
            dead_end_value,
            discount,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn ncells(&self) -> usize {
        self.rows * self.cols
    }

    pub(crate) fn breeze(&self, w: &World, cell: u8) -> bool {
        w.pits & adjacent_mask(cell, self.rows, self.cols) != 0
    }

    pub(crate) fn stench(&self, w: &World, cell: u8) -> bool {
        w.wumpus & adjacent_mask(cell, self.rows, self.cols) != 0
    }

    /// Probability of a glitter percept on entering `t`, given the belief
    /// about the gold (uniform over its possible cells).
    fn glitter_prob(&self, s: &BeliefState, t: u8) -> f64 {
        match s.gold {
            Gold::Held => 0.0,
            Gold::At(c) => {
                if c == t {
                    1.0
                } else {
                    0.0
                }
            }
            Gold::Unknown => {
                let n = s.possible_gold.count_ones();
                if n == 0 || s.possible_gold & (1 << t) == 0 {
                    0.0
                } else {
                    1.0 / n as f64
                }
            }
        }
    }

    fn gold_after_percept(&self, s: &BeliefState, cell: u8, glitter: bool) -> (Gold, u16) {
        if glitter {
            (Gold::At(cell), 1u16 << cell)
        } else {
            match s.gold {
                Gold::Unknown => (Gold::Unknown, s.possible_gold & !(1u16 << cell)),
                g => (g, s.possible_gold),
            }
        }
    }

    /// The belief after stepping onto `t` with the given resolution; shared
    /// between the outcome enumeration and the hidden-world step.
    pub(crate) fn move_outcome(
        &self,
        s: &BeliefState,
        t: u8,
        resolution: &MoveResolution,
    ) -> BeliefState {
        match resolution {
            MoveResolution::Death => BeliefState {
                pos: t as i8,
                heading: s.heading,
                alive: false,
                gold: s.gold,
                possible_gold: s.possible_gold,
                worlds: s.worlds.iter().copied().filter(|w| w.hazard_at(t)).collect(),
            },
            MoveResolution::Safe {
                breeze,
                stench,
                glitter,
            } => {
                let worlds: Vec<World> = s
                    .worlds
                    .iter()
                    .copied()
                    .filter(|w| {
                        !w.hazard_at(t)
                            && self.breeze(w, t) == *breeze
                            && self.stench(w, t) == *stench
                    })
                    .collect();
                let (gold, possible_gold) = self.gold_after_percept(s, t, *glitter);
                BeliefState {
                    pos: t as i8,
                    heading: s.heading,
                    alive: true,
                    gold,
                    possible_gold,
                    worlds,
                }
            }
        }
    }

    /// Percept at the current cell without moving; the entrance percept.
    pub(crate) fn observe_at(
        &self,
        s: &BeliefState,
        cell: u8,
        breeze: bool,
        stench: bool,
        glitter: bool,
    ) -> BeliefState {
        let worlds: Vec<World> = s
            .worlds
            .iter()
            .copied()
            .filter(|w| self.breeze(w, cell) == breeze && self.stench(w, cell) == stench)
            .collect();
        let (gold, possible_gold) = self.gold_after_percept(s, cell, glitter);
        BeliefState {
            worlds,
            gold,
            possible_gold,
            ..s.clone()
        }
    }
}

impl Problem for WumpusProblem {
    type State = BeliefState;

    fn number_actions(&self, _s: &BeliefState) -> usize {
        NUM_ACTIONS
    }

    fn applicable(&self, s: &BeliefState, a: usize) -> bool {
        if s.pos < 0 {
            return false;
        }
        match a {
            MOVE_FORWARD => target_cell(s.pos as u8, s.heading, self.rows, self.cols) != s.pos as u8,
            TURN_RIGHT | TURN_LEFT => true,
            GRAB => s.gold == Gold::At(s.pos as u8),
            EXIT => s.pos == 0,
            _ => false,
        }
    }

    fn cost(&self, _s: &BeliefState, _a: usize) -> f64 {
        1.0
    }

    fn next(&self, s: &BeliefState, a: usize) -> Vec<(BeliefState, f64)> {
        debug_assert!(self.applicable(s, a));
        match a {
            TURN_RIGHT => vec![(
                BeliefState {
                    heading: s.heading.right(),
                    ..s.clone()
                },
                1.0,
            )],
            TURN_LEFT => vec![(
                BeliefState {
                    heading: s.heading.left(),
                    ..s.clone()
                },
                1.0,
            )],
            GRAB => vec![(
                BeliefState {
                    gold: Gold::Held,
                    ..s.clone()
                },
                1.0,
            )],
            EXIT => vec![(
                BeliefState {
                    pos: OUTSIDE_CAVE,
                    ..s.clone()
                },
                1.0,
            )],
            MOVE_FORWARD => {
                let t = target_cell(s.pos as u8, s.heading, self.rows, self.cols);
                let total = s.worlds.len() as f64;
                debug_assert!(total > 0.0, "belief must stay consistent");
                let mut outcomes = Vec::new();

                let deaths = s.worlds.iter().filter(|w| w.hazard_at(t)).count();
                if deaths > 0 {
                    outcomes.push((
                        self.move_outcome(s, t, &MoveResolution::Death),
                        deaths as f64 / total,
                    ));
                }

                let p_glitter = self.glitter_prob(s, t);
                for (breeze, stench) in
                    [(false, false), (false, true), (true, false), (true, true)]
                {
                    let count = s
                        .worlds
                        .iter()
                        .filter(|w| {
                            !w.hazard_at(t)
                                && self.breeze(w, t) == breeze
                                && self.stench(w, t) == stench
                        })
                        .count();
                    if count == 0 {
                        continue;
                    }
                    let p_obs = count as f64 / total;
                    if p_glitter > 0.0 {
                        let resolution = MoveResolution::Safe {
                            breeze,
                            stench,
                            glitter: true,
                        };
                        outcomes.push((self.move_outcome(s, t, &resolution), p_obs * p_glitter));
                    }
                    if p_glitter < 1.0 {
                        let resolution = MoveResolution::Safe {
                            breeze,
                            stench,
                            glitter: false,
                        };
                        outcomes
                            .push((self.move_outcome(s, t, &resolution), p_obs * (1.0 - p_glitter)));
                    }
                }
                outcomes
            }
            _ => panic!("next on unknown action {}", a),
        }
    }

    fn terminal(&self, s: &BeliefState) -> bool {
        s.pos == OUTSIDE_CAVE && s.gold == Gold::Held
    }

    fn dead_end(&self, s: &BeliefState) -> bool {
        !s.alive || (s.pos == OUTSIDE_CAVE && s.gold != Gold::Held)
    }

    fn dead_end_value(&self) -> f64 {
        self.dead_end_value
    }

    fn discount(&self) -> f64 {
        self.discount
    }

    /// The belief before the first percept: every placement possible, gold
    /// anywhere, agent at the entrance facing north.
    fn init(&self) -> BeliefState {
        let pits = enumerate_placements(self.ncells(), self.npits);
        let wumpus = enumerate_placements(self.ncells(), self.nwumpus);
        let mut worlds = Vec::with_capacity(pits.len() * wumpus.len());
        for &p in &pits {
            for &w in &wumpus {
                worlds.push(World { pits: p, wumpus: w });
            }
        }
        BeliefState {
            pos: 0,
            heading: Heading::North,
            alive: true,
            gold: Gold::Unknown,
            possible_gold: ((1u32 << self.ncells()) - 1) as u16,
            worlds,
        }
    }
}

/// Execution dynamics against one concrete cave.
pub struct WumpusWorld {
    problem: WumpusProblem,
    world: World,
    gold_cell: u8,
}

impl WumpusWorld {
    pub fn new(problem: WumpusProblem) -> Self {
        Self {
            problem,
            world: World { pits: 0, wumpus: 0 },
            gold_cell: 0,
        }
    }

    pub fn world(&self) -> World {
        self.world
    }

    pub fn gold_cell(&self) -> u8 {
        self.gold_cell
    }

    pub fn set_world(&mut self, world: World, gold_cell: u8) {
        assert!(!world.hazard_at(0), "the entrance must be clear");
        self.world = world;
        self.gold_cell = gold_cell;
    }
}

impl WorldModel<WumpusProblem> for WumpusWorld {
    fn reset(&mut self, rng: &mut ChaCha8Rng) -> BeliefState {
        let ncells = self.problem.ncells();
        let pits = enumerate_placements(ncells, self.problem.npits);
        let wumpus = enumerate_placements(ncells, self.problem.nwumpus);
        self.world = World {
            pits: pits[rng.gen_range(0..pits.len())],
            wumpus: wumpus[rng.gen_range(0..wumpus.len())],
        };
        self.gold_cell = rng.gen_range(0..ncells) as u8;

        let init = self.problem.init();
        self.problem.observe_at(
            &init,
            0,
            self.problem.breeze(&self.world, 0),
            self.problem.stench(&self.world, 0),
            self.gold_cell == 0,
        )
    }

    fn step(&mut self, s: &BeliefState, a: usize, _rng: &mut ChaCha8Rng) -> BeliefState {
        match a {
            TURN_RIGHT => BeliefState {
                heading: s.heading.right(),
                ..s.clone()
            },
            TURN_LEFT => BeliefState {
                heading: s.heading.left(),
                ..s.clone()
            },
            GRAB => BeliefState {
                gold: Gold::Held,
                ..s.clone()
            },
            EXIT => BeliefState {
                pos: OUTSIDE_CAVE,
                ..s.clone()
            },
            MOVE_FORWARD => {
                let t = target_cell(
                    s.pos as u8,
                    s.heading,
                    self.problem.rows(),
                    self.problem.cols(),
                );
                if self.world.hazard_at(t) {
                    self.problem.move_outcome(s, t, &MoveResolution::Death)
                } else {
                    let resolution = MoveResolution::Safe {
                        breeze: self.problem.breeze(&self.world, t),
                        stench: self.problem.stench(&self.world, t),
                        glitter: self.gold_cell == t,
                    };
                    self.problem.move_outcome(s, t, &resolution)
                }
            }
            _ => panic!("step on unknown action {}", a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    // 2x2 cave (cols = 2): row 1 holds cells 2 3, row 0 holds cells 0 1.
    fn small() -> WumpusProblem {
        WumpusProblem::new(2, 2, 1, 0)
    }

    #[test]
    fn initial_belief_enumerates_every_placement() {
        let p = small();
        let s = p.init();
        assert_eq!(s.worlds.len(), 3);
        assert_eq!(s.possible_gold, 0b1111);
        assert_eq!(s.gold, Gold::Unknown);
        assert!(s.alive);
        assert_eq!(s.pos, 0);
    }

    #[test]
    fn move_outcomes_partition_the_belief() {
        let p = small();
        let s = p.init();
        // Face east toward cell 1.
        let s = BeliefState {
            heading: Heading::East,
            ..s
        };
        let outcomes = p.next(&s, MOVE_FORWARD);

        let total: f64 = outcomes.iter().map(|o| o.1).sum();
        assert!((total - 1.0).abs() < 1e-12);

        // Death (pit at 1) + two breeze groups, each split on glitter.
        assert_eq!(outcomes.len(), 5);

        let death: Vec<_> = outcomes.iter().filter(|(s2, _)| !s2.alive).collect();
        assert_eq!(death.len(), 1);
        assert!((death[0].1 - 1.0 / 3.0).abs() < 1e-12);
        assert!(p.dead_end(&death[0].0));

        for (s2, prob) in &outcomes {
            assert!(*prob > 0.0);
            if s2.alive {
                assert_eq!(s2.pos, 1);
                // Surviving the move rules out a pit at cell 1.
                assert!(s2.worlds.iter().all(|w| !w.hazard_at(1)));
            }
        }

        // A glitter outcome pins the gold; a quiet one eliminates the cell.
        assert!(outcomes
            .iter()
            .any(|(s2, _)| s2.alive && s2.gold == Gold::At(1) && s2.possible_gold == 1 << 1));
        assert!(outcomes
            .iter()
            .any(|(s2, _)| s2.alive && s2.gold == Gold::Unknown && s2.possible_gold & (1 << 1) == 0));
    }

    #[test]
    fn turns_and_grab_and_exit_are_deterministic() {
        let p = small();
        let s = p.init();
        let turned = p.next(&s, TURN_RIGHT);
        assert_eq!(turned.len(), 1);
        assert_eq!(turned[0].0.heading, Heading::East);

        let found = BeliefState {
            gold: Gold::At(0),
            possible_gold: 1,
            ..p.init()
        };
        assert!(p.applicable(&found, GRAB));
        let grabbed = p.next(&found, GRAB);
        assert_eq!(grabbed.len(), 1);
        assert_eq!(grabbed[0].0.gold, Gold::Held);

        let holding = grabbed.into_iter().next().unwrap().0;
        assert!(p.applicable(&holding, EXIT));
        let out = p.next(&holding, EXIT);
        assert_eq!(out[0].0.pos, OUTSIDE_CAVE);
        assert!(p.terminal(&out[0].0));
    }

    #[test]
    fn exiting_empty_handed_is_a_dead_end() {
        let p = small();
        let s = BeliefState {
            pos: OUTSIDE_CAVE,
            ..p.init()
        };
        assert!(!p.terminal(&s));
        assert!(p.dead_end(&s));
    }

    #[test]
    fn world_steps_match_an_enumerated_outcome() {
        let p = small();
        let mut world = WumpusWorld::new(p.clone());
        world.set_world(
            World {
                pits: 1 << 2,
                wumpus: 0,
            },
            3,
        );

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // Entrance percept: pit at 2 is adjacent to 0, so a breeze.
        let s0 = p.observe_at(&p.init(), 0, true, false, false);
        assert_eq!(s0.worlds.len(), 2);

        let s0 = BeliefState {
            heading: Heading::East,
            ..s0
        };
        let stepped = world.step(&s0, MOVE_FORWARD, &mut rng);

        let outcomes = p.next(&s0, MOVE_FORWARD);
        assert!(
            outcomes.iter().any(|(s2, prob)| *s2 == stepped && *prob > 0.0),
            "executed step must be one of the enumerated outcomes"
        );
        // The quiet percept at cell 1 leaves only the true world.
        assert!(stepped.alive);
        assert_eq!(stepped.worlds, vec![world.world()]);
    }

    #[test]
    fn reset_applies_the_entrance_percept() {
        let p = WumpusProblem::new(2, 2, 1, 1);
        let mut world = WumpusWorld::new(p.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..8 {
            let s = world.reset(&mut rng);
            assert!(!world.world().hazard_at(0));
            assert!(s.alive);
            // The true world always survives the percept filter.
            assert!(s.worlds.contains(&world.world()));
            if world.gold_cell() == 0 {
                assert_eq!(s.gold, Gold::At(0));
            } else {
                assert!(s.possible_gold & 1 == 0);
            }
        }
    }
}
