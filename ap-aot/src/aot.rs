//! Anytime AND/OR search with delta-guided frontier expansion.
//!
//! `decide` grows a bounded AND/OR graph from the queried state, keeping a
//! lower-bound value at every node. Tips are expanded in order of the
//! smallest capacity to change the greedy action at the root: each node
//! carries a signed `delta`, non-negative on the current best policy and
//! negative off it, and the two bounded queues hold the on-policy and
//! off-policy frontiers. Every `expansions_per_iteration` expansions the
//! deltas and queues are rebuilt top-down.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use thiserror::Error;

use ap_core::{Policy, Problem};

use crate::arena::Arena;
use crate::node::{ActionId, ActionNode, NodeRef, StateId, StateNode};
use crate::queue::BoundedDeltaQueue;

/// Engine parameters. See [`AotPolicy::new`] for validation.
#[derive(Clone, Copy, Debug)]
pub struct AotConfig {
    /// Total tip expansions per decision. Zero delegates to the base policy.
    pub width: u32,
    /// Evaluation horizon; tips at or beyond it are not re-enqueued.
    pub depth_bound: u16,
    /// Probability of picking the on-policy frontier when both queues are
    /// non-empty.
    pub parameter: f64,
    /// Estimate new action values by sampled rollouts instead of expanding
    /// them full-width on creation.
    pub delayed_evaluation: bool,
    /// Expansions between delta recomputations; also each queue's capacity.
    pub expansions_per_iteration: u32,
    /// Rollouts averaged per state-leaf evaluation.
    pub leaf_nsamples: u32,
    /// Sampled outcomes per action-leaf evaluation.
    pub delayed_evaluation_nsamples: u32,
}

impl Default for AotConfig {
    fn default() -> Self {
        Self {
            width: 32,
            depth_bound: 50,
            parameter: 0.5,
            delayed_evaluation: true,
            expansions_per_iteration: 100,
            leaf_nsamples: 1,
            delayed_evaluation_nsamples: 1,
        }
    }
}

impl From<ap_core::EngineConfig> for AotConfig {
    fn from(cfg: ap_core::EngineConfig) -> Self {
        Self {
            width: cfg.width,
            depth_bound: cfg.depth_bound,
            parameter: cfg.parameter,
            delayed_evaluation: cfg.delayed_evaluation,
            expansions_per_iteration: cfg.expansions_per_iteration,
            leaf_nsamples: cfg.leaf_nsamples,
            delayed_evaluation_nsamples: cfg.delayed_evaluation_nsamples,
        }
    }
}

#[derive(Debug, Error)]
pub enum AotError {
    #[error("invalid config: {msg}")]
    InvalidConfig { msg: &'static str },
}

/// Counters accumulated across every `decide` of this engine.
#[derive(Default, Clone, Debug)]
pub struct AotStats {
    pub decisions: u64,
    pub expansions: u64,
    pub evaluations: u64,
    pub from_inside: u64,
    pub from_outside: u64,
    pub nodes_allocated: u64,
}

/// The anytime policy. Plugs into the same [`Policy`] seam as its base
/// policy, which doubles as its rollout oracle.
pub struct AotPolicy<P: Problem, B> {
    pub(crate) cfg: AotConfig,
    pub(crate) base: B,
    pub(crate) arena: Arena<P::State>,
    pub(crate) index: FxHashMap<(P::State, u16), StateId>,
    pub(crate) inside: BoundedDeltaQueue,
    pub(crate) outside: BoundedDeltaQueue,
    pub(crate) root: Option<StateId>,
    pub(crate) stats: AotStats,
}

impl<P: Problem, B: Policy<P>> AotPolicy<P, B> {
    pub fn new(cfg: AotConfig, base: B) -> Result<Self, AotError> {
        if !(cfg.parameter.is_finite() && (0.0..=1.0).contains(&cfg.parameter)) {
            return Err(AotError::InvalidConfig {
                msg: "parameter must be in [0, 1]",
            });
        }
        if cfg.expansions_per_iteration == 0 {
            return Err(AotError::InvalidConfig {
                msg: "expansions_per_iteration must be > 0",
            });
        }
        if cfg.leaf_nsamples == 0 {
            return Err(AotError::InvalidConfig {
                msg: "leaf_nsamples must be > 0",
            });
        }
        if cfg.delayed_evaluation_nsamples == 0 {
            return Err(AotError::InvalidConfig {
                msg: "delayed_evaluation_nsamples must be > 0",
            });
        }
        let capacity = cfg.expansions_per_iteration as usize;
        Ok(Self {
            cfg,
            base,
            arena: Arena::new(),
            index: FxHashMap::default(),
            inside: BoundedDeltaQueue::new(capacity),
            outside: BoundedDeltaQueue::new(capacity),
            root: None,
            stats: AotStats::default(),
        })
    }

    /// Independent engine with the same parameters and base policy, empty
    /// arena and counters.
    pub fn clone_engine(&self) -> Self
    where
        B: Clone,
    {
        Self::new(self.cfg, self.base.clone()).expect("config was validated at construction")
    }

    pub fn config(&self) -> &AotConfig {
        &self.cfg
    }

    pub fn stats(&self) -> &AotStats {
        &self.stats
    }

    /// Value estimate at the root of the last `decide`.
    pub fn root_value(&self) -> Option<f64> {
        self.root.map(|id| self.arena.state(id).value)
    }

    /// Pick an action for `s`. Returns `None` only when there is nothing to
    /// decide (the state is already a goal).
    ///
    /// With `width == 0` the engine never builds a graph and delegates to the
    /// base policy outright, so the two are interchangeable at that setting.
    pub fn decide(&mut self, problem: &P, s: &P::State, rng: &mut ChaCha8Rng) -> Option<usize> {
        self.stats.decisions += 1;
        if self.cfg.width == 0 {
            return Some(self.base.choose(problem, s, rng));
        }

        self.clear();
        let (root, _) = self.fetch_node(problem, s.clone(), 0, rng);
        self.root = Some(root);
        if self.arena.state(root).is_goal {
            return None;
        }
        if self.arena.state(root).is_dead_end {
            return Some(self.base.choose(problem, s, rng));
        }
        self.insert_into_priority_queue(NodeRef::State(root));

        let mut expanded = 0u32;
        let mut to_propagate: Vec<NodeRef> = Vec::new();
        while expanded < self.cfg.width && !self.queues_empty() {
            let mut in_iteration = 0u32;
            while expanded < self.cfg.width
                && in_iteration < self.cfg.expansions_per_iteration
                && !self.queues_empty()
            {
                self.expand_next(problem, &mut to_propagate, rng);
                for node in std::mem::take(&mut to_propagate) {
                    self.propagate(problem, node);
                }
                in_iteration += 1;
                expanded += 1;
            }
            self.clear_priority_queues();
            self.recompute_delta(problem, root);
        }

        let root_node = self.arena.state(root);
        let best = root_node.best_action?;
        let action = self.arena.action(root_node.children[best]).action;
        debug_assert!(problem.applicable(s, action));
        Some(action)
    }

    fn clear(&mut self) {
        self.clear_priority_queues();
        self.arena.clear();
        self.index.clear();
        self.root = None;
    }

    // ---- node interning ------------------------------------------------

    /// Look up `(state, depth)`, creating and evaluating the node if absent.
    /// A resident non-dead-end leaf gets one more evaluation batch averaged
    /// in; the flag reports that its value moved.
    pub(crate) fn fetch_node(
        &mut self,
        problem: &P,
        state: P::State,
        depth: u16,
        rng: &mut ChaCha8Rng,
    ) -> (StateId, bool) {
        let key = (state, depth);
        if let Some(&id) = self.index.get(&key) {
            let node = self.arena.state(id);
            if node.is_leaf() && !node.is_dead_end {
                let eval = self.evaluate_state_leaf(problem, &key.0, depth, rng);
                let node = self.arena.state_mut(id);
                let weighted = node.value * node.nsamples as f64 + eval;
                node.nsamples += self.cfg.leaf_nsamples;
                node.value = weighted / node.nsamples as f64;
                (id, true)
            } else {
                (id, false)
            }
        } else {
            self.stats.nodes_allocated += 1;
            let (state, depth) = key;
            let mut node = StateNode::new(state.clone(), depth);
            let terminal = problem.terminal(&node.state);
            let dead_end = problem.dead_end(&node.state);
            assert!(
                !(terminal && dead_end),
                "problem contract violation: state is both terminal and dead end: {:?}",
                node.state
            );
            if terminal {
                node.value = 0.0;
                node.is_goal = true;
            } else if dead_end {
                node.value = problem.dead_end_value();
                node.is_dead_end = true;
            } else {
                node.value = self.evaluate_state_leaf(problem, &node.state, depth, rng);
                node.nsamples = self.cfg.leaf_nsamples;
            }
            let id = self.arena.push_state(node);
            self.index.insert((state, depth), id);
            (id, false)
        }
    }

    // ---- expansion -----------------------------------------------------

    fn expand_next(&mut self, problem: &P, to_propagate: &mut Vec<NodeRef>, rng: &mut ChaCha8Rng) {
        self.stats.expansions += 1;
        let node = self.select_from_priority_queue(rng);
        match node {
            NodeRef::State(id) => self.expand_state(problem, id, to_propagate, rng),
            NodeRef::Action(id) => self.expand_action(problem, id, to_propagate, true, rng),
        }
    }

    /// Create one action node per applicable action. Eager mode expands each
    /// action on the spot; delayed mode estimates its value by rollouts.
    fn expand_state(
        &mut self,
        problem: &P,
        id: StateId,
        to_propagate: &mut Vec<NodeRef>,
        rng: &mut ChaCha8Rng,
    ) {
        debug_assert!(self.arena.state(id).is_leaf());
        debug_assert!(!self.arena.state(id).is_dead_end);
        let state = self.arena.state(id).state.clone();
        let depth = self.arena.state(id).depth;

        let n = problem.number_actions(&state);
        for a in 0..n {
            if !problem.applicable(&state, a) {
                continue;
            }
            self.stats.nodes_allocated += 1;
            let a_id = self
                .arena
                .push_action(ActionNode::new(a, problem.cost(&state, a), id));
            self.arena.state_mut(id).children.push(a_id);

            if !self.cfg.delayed_evaluation {
                self.expand_action(problem, a_id, to_propagate, false, rng);
            } else {
                let eval = self.evaluate_action_leaf(problem, &state, a, depth + 1, rng);
                let a_node = self.arena.action_mut(a_id);
                a_node.value = a_node.action_cost + problem.discount() * eval;
                a_node.nsamples = self.cfg.delayed_evaluation_nsamples * self.cfg.leaf_nsamples;
            }
        }
        assert!(
            !self.arena.state(id).children.is_empty(),
            "problem contract violation: non-dead-end state has no applicable action: {:?}",
            state
        );
        to_propagate.push(NodeRef::State(id));
    }

    /// Enumerate the full outcome distribution of an action leaf, interning
    /// child states and wiring parent links both ways.
    fn expand_action(
        &mut self,
        problem: &P,
        a_id: ActionId,
        to_propagate: &mut Vec<NodeRef>,
        picked_from_queue: bool,
        rng: &mut ChaCha8Rng,
    ) {
        debug_assert!(self.arena.action(a_id).is_leaf());
        let parent_id = self.arena.action(a_id).parent;
        let action = self.arena.action(a_id).action;
        debug_assert!(!self.arena.state(parent_id).is_dead_end);
        let parent_state = self.arena.state(parent_id).state.clone();
        let child_depth = self.arena.state(parent_id).depth + 1;

        let outcomes = problem.next(&parent_state, action);
        assert!(
            !outcomes.is_empty(),
            "problem contract violation: applicable action {} has empty support",
            action
        );
        debug_assert!(
            (outcomes.iter().map(|o| o.1).sum::<f64>() - 1.0).abs() < 1e-6,
            "transition probabilities must sum to 1"
        );

        let mut expected = 0.0;
        for (i, (s2, p)) in outcomes.into_iter().enumerate() {
            debug_assert!(p > 0.0);
            let (child_id, re_evaluated) = self.fetch_node(problem, s2, child_depth, rng);
            if re_evaluated {
                debug_assert!(self.arena.state(child_id).is_leaf());
                to_propagate.push(NodeRef::State(child_id));
            }
            self.arena.state_mut(child_id).parents.push((i as u32, a_id));
            let v = self.arena.state(child_id).value;
            self.arena.action_mut(a_id).children.push((p, child_id));
            expected += p * v;
        }
        {
            let a_node = self.arena.action_mut(a_id);
            a_node.value = a_node.action_cost + problem.discount() * expected;
        }
        to_propagate.push(NodeRef::Action(a_id));

        // Expanding a tip picked from the queue sharpens this state's action
        // comparison; bring the still-leaf siblings' estimates along.
        if picked_from_queue {
            let sibling_count = self.arena.state(parent_id).children.len();
            for i in 0..sibling_count {
                let sib_id = self.arena.state(parent_id).children[i];
                if !self.arena.action(sib_id).is_leaf() {
                    continue;
                }
                let (sib_action, sib_cost, sib_value, sib_nsamples) = {
                    let sib = self.arena.action(sib_id);
                    (sib.action, sib.action_cost, sib.value, sib.nsamples)
                };
                let old = (sib_value - sib_cost) / problem.discount();
                let eval =
                    self.evaluate_action_leaf(problem, &parent_state, sib_action, child_depth, rng);
                let weighted = old * sib_nsamples as f64 + eval;
                let sib = self.arena.action_mut(sib_id);
                sib.nsamples += self.cfg.delayed_evaluation_nsamples * self.cfg.leaf_nsamples;
                sib.value = sib_cost + problem.discount() * weighted / sib.nsamples as f64;
            }
        }
    }

    // ---- value propagation ---------------------------------------------

    /// Bottom-up re-evaluation from one seed state node. The `in_queue` flag
    /// keeps the work-list free of duplicates on the shared graph.
    pub(crate) fn propagate(&mut self, problem: &P, node: NodeRef) {
        let seed = match node {
            NodeRef::State(id) => id,
            NodeRef::Action(id) => self.arena.action(id).parent,
        };
        let mut queue: VecDeque<StateId> = VecDeque::new();
        queue.push_back(seed);
        self.arena.state_mut(seed).in_queue = true;
        while let Some(s_id) = queue.pop_front() {
            self.arena.state_mut(s_id).in_queue = false;
            let old_value = self.arena.state(s_id).value;
            let is_leaf = self.arena.state(s_id).is_leaf();
            if !is_leaf {
                self.update_state_value(s_id);
            }
            if is_leaf || self.arena.state(s_id).value != old_value {
                for k in 0..self.arena.state(s_id).parents.len() {
                    let (_, a_id) = self.arena.state(s_id).parents[k];
                    let old = self.arena.action(a_id).value;
                    self.update_action_value(problem, a_id);
                    let parent_id = self.arena.action(a_id).parent;
                    if self.arena.action(a_id).value != old
                        && !self.arena.state(parent_id).in_queue
                    {
                        queue.push_back(parent_id);
                        self.arena.state_mut(parent_id).in_queue = true;
                    }
                }
            }
        }
    }

    fn update_state_value(&mut self, s_id: StateId) {
        debug_assert!(!self.arena.state(s_id).is_goal);
        if self.arena.state(s_id).is_dead_end {
            return;
        }
        let mut best_value = f64::INFINITY;
        let mut best = None;
        for i in 0..self.arena.state(s_id).children.len() {
            let a_id = self.arena.state(s_id).children[i];
            let v = self.arena.action(a_id).value;
            if v < best_value {
                best_value = v;
                best = Some(i);
            }
        }
        debug_assert!(best.is_some(), "interior state node with no children");
        let node = self.arena.state_mut(s_id);
        node.value = best_value;
        node.best_action = best;
    }

    fn update_action_value(&mut self, problem: &P, a_id: ActionId) {
        let mut expected = 0.0;
        for k in 0..self.arena.action(a_id).children.len() {
            let (p, s_id) = self.arena.action(a_id).children[k];
            expected += p * self.arena.state(s_id).value;
        }
        let a_node = self.arena.action_mut(a_id);
        a_node.value = a_node.action_cost + problem.discount() * expected;
    }

    // ---- delta recomputation -------------------------------------------

    /// Top-down pass assigning every reachable node its signed priority and
    /// re-seeding the frontier queues. The two work-lists alternate so all
    /// of a state's parent actions are processed before the state itself.
    pub(crate) fn recompute_delta(&mut self, problem: &P, root: StateId) {
        debug_assert!(!self.arena.state(root).is_goal);
        debug_assert!(!self.arena.state(root).is_dead_end);

        let mut s_queue: Vec<StateId> = Vec::new();
        let mut a_queue: Vec<ActionId> = Vec::new();

        {
            let r = self.arena.state_mut(root);
            r.delta = f64::INFINITY;
            r.in_best_policy = true;
        }
        s_queue.push(root);

        while !s_queue.is_empty() || !a_queue.is_empty() {
            while let Some(s_id) = s_queue.pop() {
                self.arena.state_mut(s_id).in_queue = false;
                self.recompute_state(s_id, &mut a_queue);
            }
            while let Some(a_id) = a_queue.pop() {
                self.recompute_action(problem, a_id, &mut s_queue);
            }
        }
    }

    fn recompute_state(&mut self, s_id: StateId, a_queue: &mut Vec<ActionId>) {
        debug_assert!(!self.arena.state(s_id).is_goal);
        debug_assert!(!self.arena.state(s_id).is_dead_end);
        if self.arena.state(s_id).is_leaf() {
            if self.arena.state(s_id).depth < self.cfg.depth_bound {
                self.insert_into_priority_queue(NodeRef::State(s_id));
            }
            return;
        }

        let best = self
            .arena
            .state(s_id)
            .best_action
            .expect("interior state node without a best action");
        let best_value = {
            let a_id = self.arena.state(s_id).children[best];
            self.arena.action(a_id).value
        };
        let s_delta = self.arena.state(s_id).delta;

        if self.arena.state(s_id).in_best_policy {
            debug_assert!(s_delta >= 0.0);

            // Second-best margin: how far the runner-up is from dethroning
            // the current best action.
            let mut margin = f64::INFINITY;
            for i in 0..self.arena.state(s_id).children.len() {
                if i == best {
                    continue;
                }
                let a_id = self.arena.state(s_id).children[i];
                margin = margin.min(self.arena.action(a_id).value - best_value);
            }

            for i in 0..self.arena.state(s_id).children.len() {
                let a_id = self.arena.state(s_id).children[i];
                let a_node = self.arena.action_mut(a_id);
                if i == best {
                    a_node.delta = s_delta.min(margin);
                    a_node.in_best_policy = true;
                    debug_assert!(a_node.delta >= 0.0);
                } else {
                    a_node.delta = best_value - a_node.value;
                    a_node.in_best_policy = false;
                    debug_assert!(a_node.delta <= 0.0);
                }
                a_queue.push(a_id);
            }
        } else {
            debug_assert!(s_delta <= 0.0);
            for i in 0..self.arena.state(s_id).children.len() {
                let a_id = self.arena.state(s_id).children[i];
                let a_node = self.arena.action_mut(a_id);
                a_node.delta = s_delta + best_value - a_node.value;
                a_node.in_best_policy = false;
                debug_assert!(a_node.delta <= 0.0);
                a_queue.push(a_id);
            }
        }
    }

    fn recompute_action(&mut self, problem: &P, a_id: ActionId, s_queue: &mut Vec<StateId>) {
        if self.arena.action(a_id).is_leaf() {
            let parent_depth = {
                let parent = self.arena.action(a_id).parent;
                self.arena.state(parent).depth
            };
            if parent_depth < self.cfg.depth_bound {
                self.insert_into_priority_queue(NodeRef::Action(a_id));
            }
            return;
        }

        for k in 0..self.arena.action(a_id).children.len() {
            let (_, s_id) = self.arena.action(a_id).children[k];
            {
                let s_node = self.arena.state(s_id);
                if s_node.in_queue || s_node.is_goal || s_node.is_dead_end {
                    continue;
                }
            }

            // A child's leverage through each parent edge is the parent's
            // delta diluted by the edge's weight in the expectation.
            let mut delta = f64::INFINITY;
            let mut in_best = false;
            for j in 0..self.arena.state(s_id).parents.len() {
                let (outcome, p_id) = self.arena.state(s_id).parents[j];
                let p_node = self.arena.action(p_id);
                let (prob, child) = p_node.children[outcome as usize];
                debug_assert_eq!(child, s_id);
                let d = p_node.delta / (problem.discount() * prob);
                delta = delta.min(d.abs());
                in_best = in_best || p_node.in_best_policy;
            }

            let s_node = self.arena.state_mut(s_id);
            s_node.delta = if in_best { delta } else { -delta };
            s_node.in_best_policy = in_best;
            s_node.in_queue = true;
            s_queue.push(s_id);
        }
    }

    // ---- leaf evaluation -----------------------------------------------

    /// Mean of `leaf_nsamples` base-policy rollouts to the horizon; zero at
    /// or beyond it.
    fn evaluate_state_leaf(
        &mut self,
        problem: &P,
        s: &P::State,
        depth: u16,
        rng: &mut ChaCha8Rng,
    ) -> f64 {
        self.stats.evaluations += self.cfg.leaf_nsamples as u64;
        if depth >= self.cfg.depth_bound {
            return 0.0;
        }
        ap_core::rollout::evaluation(
            problem,
            &mut self.base,
            s,
            self.cfg.leaf_nsamples,
            self.cfg.depth_bound - depth,
            rng,
        )
    }

    /// Mean state-leaf evaluation over sampled outcomes of `action`.
    fn evaluate_action_leaf(
        &mut self,
        problem: &P,
        s: &P::State,
        action: usize,
        depth: u16,
        rng: &mut ChaCha8Rng,
    ) -> f64 {
        let mut total = 0.0;
        for _ in 0..self.cfg.delayed_evaluation_nsamples {
            let s2 = problem.sample(s, action, rng);
            total += self.evaluate_state_leaf(problem, &s2, depth, rng);
        }
        total / self.cfg.delayed_evaluation_nsamples as f64
    }

    // ---- priority queues -----------------------------------------------

    pub(crate) fn queues_empty(&self) -> bool {
        self.inside.is_empty() && self.outside.is_empty()
    }

    pub(crate) fn insert_into_priority_queue(&mut self, node: NodeRef) {
        if self.in_pq(node) {
            return;
        }
        let delta = self.delta_of(node);
        let (inserted, removed) = {
            let queue = if delta >= 0.0 {
                &mut self.inside
            } else {
                &mut self.outside
            };
            let (inserted, evicted) = queue.push(delta.abs(), node);
            let removed = if evicted {
                Some(
                    queue
                        .removed_element()
                        .expect("eviction exposes the removed entry"),
                )
            } else {
                None
            };
            (inserted, removed)
        };
        if let Some(entry) = removed {
            debug_assert!(self.in_pq(entry.node));
            self.set_in_pq(entry.node, false);
        }
        if inserted {
            self.set_in_pq(node, true);
        }
    }

    fn select_from_priority_queue(&mut self, rng: &mut ChaCha8Rng) -> NodeRef {
        debug_assert!(!self.queues_empty());
        let from_inside = if self.inside.is_empty() {
            false
        } else if self.outside.is_empty() {
            true
        } else {
            rng.gen::<f64>() < self.cfg.parameter
        };
        let entry = if from_inside {
            self.stats.from_inside += 1;
            self.inside.pop()
        } else {
            self.stats.from_outside += 1;
            self.outside.pop()
        }
        .expect("selected queue is non-empty");
        debug_assert!(self.in_pq(entry.node));
        self.set_in_pq(entry.node, false);
        entry.node
    }

    pub(crate) fn clear_priority_queues(&mut self) {
        for entry in self.inside.drain() {
            debug_assert!(self.in_pq(entry.node));
            self.set_in_pq(entry.node, false);
        }
        for entry in self.outside.drain() {
            debug_assert!(self.in_pq(entry.node));
            self.set_in_pq(entry.node, false);
        }
    }

    pub(crate) fn in_pq(&self, node: NodeRef) -> bool {
        match node {
            NodeRef::State(id) => self.arena.state(id).in_pq,
            NodeRef::Action(id) => self.arena.action(id).in_pq,
        }
    }

    fn set_in_pq(&mut self, node: NodeRef, value: bool) {
        match node {
            NodeRef::State(id) => self.arena.state_mut(id).in_pq = value,
            NodeRef::Action(id) => self.arena.action_mut(id).in_pq = value,
        }
    }

    fn delta_of(&self, node: NodeRef) -> f64 {
        match node {
            NodeRef::State(id) => self.arena.state(id).delta,
            NodeRef::Action(id) => self.arena.action(id).delta,
        }
    }
}

impl<P: Problem, B: Policy<P>> Policy<P> for AotPolicy<P, B> {
    fn choose(&mut self, problem: &P, s: &P::State, rng: &mut ChaCha8Rng) -> usize {
        match self.decide(problem, s, rng) {
            Some(a) => a,
            None => self.base.choose(problem, s, rng),
        }
    }

    fn name(&self) -> &str {
        "aot"
    }
}
