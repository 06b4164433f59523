//! Arena-backed node storage.
//!
//! The arena exclusively owns every node of one decision; all cross-node
//! references are typed indices. It is cleared wholesale at the start of the
//! next decision.

use crate::node::{ActionId, ActionNode, StateId, StateNode};

pub struct Arena<S> {
    states: Vec<StateNode<S>>,
    actions: Vec<ActionNode>,
}

impl<S> Arena<S> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push_state(&mut self, n: StateNode<S>) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(n);
        id
    }

    pub fn push_action(&mut self, n: ActionNode) -> ActionId {
        let id = ActionId(self.actions.len() as u32);
        self.actions.push(n);
        id
    }

    pub fn state(&self, id: StateId) -> &StateNode<S> {
        &self.states[id.as_usize()]
    }

    pub fn state_mut(&mut self, id: StateId) -> &mut StateNode<S> {
        &mut self.states[id.as_usize()]
    }

    pub fn action(&self, id: ActionId) -> &ActionNode {
        &self.actions[id.as_usize()]
    }

    pub fn action_mut(&mut self, id: ActionId) -> &mut ActionNode {
        &mut self.actions[id.as_usize()]
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    pub fn state_ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.states.len() as u32).map(StateId)
    }

    pub fn action_ids(&self) -> impl Iterator<Item = ActionId> {
        (0..self.actions.len() as u32).map(ActionId)
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.actions.clear();
    }
}

impl<S> Default for Arena<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_get_round_trip() {
        let mut arena: Arena<u8> = Arena::new();
        let s = arena.push_state(StateNode::new(7, 0));
        let a = arena.push_action(ActionNode::new(3, 1.5, s));
        arena.state_mut(s).children.push(a);

        assert_eq!(arena.state(s).state, 7);
        assert_eq!(arena.action(a).action, 3);
        assert_eq!(arena.action(a).parent, s);
        assert_eq!(arena.num_states(), 1);
        assert_eq!(arena.num_actions(), 1);
    }

    #[test]
    fn clear_empties_both_kinds() {
        let mut arena: Arena<u8> = Arena::new();
        let s = arena.push_state(StateNode::new(0, 0));
        arena.push_action(ActionNode::new(0, 0.0, s));
        arena.clear();
        assert_eq!(arena.num_states(), 0);
        assert_eq!(arena.num_actions(), 0);
    }
}
