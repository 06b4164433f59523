//! State and action nodes of the shared AND/OR graph.
//!
//! OR-nodes ([`StateNode`]) pick the cheapest child action; AND-nodes
//! ([`ActionNode`]) aggregate over stochastic outcomes. Equal
//! `(state, depth)` pairs are interned, so a state node can have many parent
//! action nodes while an action node has exactly one parent state node.

/// Typed arena index of a state node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StateId(pub(crate) u32);

/// Typed arena index of an action node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ActionId(pub(crate) u32);

impl StateId {
    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl ActionId {
    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Handle to either node kind; what the priority queues and the propagation
/// work-list carry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeRef {
    State(StateId),
    Action(ActionId),
}

pub struct StateNode<S> {
    pub state: S,
    pub depth: u16,

    /// Lower-bound cost estimate.
    pub value: f64,
    /// Signed expansion priority; non-negative on the current best policy.
    pub delta: f64,
    /// Rollout samples accumulated into `value` while this is a leaf.
    pub nsamples: u32,

    pub is_goal: bool,
    pub is_dead_end: bool,
    pub in_best_policy: bool,
    /// Membership in the propagation / recomputation work-list.
    pub in_queue: bool,
    /// Membership in one of the two bounded priority queues.
    pub in_pq: bool,

    /// Index into `children` of the minimizing action; `None` while a leaf.
    pub best_action: Option<usize>,
    /// Back-references: `(outcome index in the parent, parent action node)`.
    pub parents: Vec<(u32, ActionId)>,
    /// One child per applicable action, in action order.
    pub children: Vec<ActionId>,
}

impl<S> StateNode<S> {
    pub fn new(state: S, depth: u16) -> Self {
        Self {
            state,
            depth,
            value: 0.0,
            delta: 0.0,
            nsamples: 0,
            is_goal: false,
            is_dead_end: false,
            in_best_policy: false,
            in_queue: false,
            in_pq: false,
            best_action: None,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A dead end is always a leaf; a goal never is.
    pub fn is_leaf(&self) -> bool {
        self.is_dead_end || (!self.is_goal && self.children.is_empty())
    }
}

pub struct ActionNode {
    /// The problem's action index at the parent state.
    pub action: usize,
    pub action_cost: f64,

    pub value: f64,
    pub delta: f64,
    pub nsamples: u32,

    pub in_best_policy: bool,
    pub in_pq: bool,

    /// The one state node this action was expanded from.
    pub parent: StateId,
    /// Full support of the outcome distribution: `(probability, child)`.
    pub children: Vec<(f64, StateId)>,
}

impl ActionNode {
    pub fn new(action: usize, action_cost: f64, parent: StateId) -> Self {
        Self {
            action,
            action_cost,
            value: 0.0,
            delta: 0.0,
            nsamples: 0,
            in_best_policy: false,
            in_pq: false,
            parent,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
