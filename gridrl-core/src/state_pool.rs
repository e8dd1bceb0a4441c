//! Canonical ids of states.
use crate::{error::GridRlError, StateInstance};
use std::collections::HashMap;
use xxhash_rust::xxh3::Xxh3Builder;

/// Bidirectional mapping between [`StateInstance`]s and dense ids.
///
/// Ids are issued in first-seen order starting at 0 and are only comparable
/// within the same pool. There is no eviction.
#[derive(Debug, Default, Clone)]
pub struct StatePool {
    ids: HashMap<StateInstance, usize, Xxh3Builder>,
    states: Vec<StateInstance>,
}

impl StatePool {
    /// Constructs an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `state`, issuing a new one if the state was never seen.
    pub fn get_state_id(&mut self, state: &StateInstance) -> usize {
        if let Some(&id) = self.ids.get(state) {
            return id;
        }
        let id = self.states.len();
        self.ids.insert(state.clone(), id);
        self.states.push(state.clone());
        id
    }

    /// Returns the id of `state` without issuing one.
    pub fn find_state_id(&self, state: &StateInstance) -> Option<usize> {
        self.ids.get(state).copied()
    }

    /// Returns the state with the given id.
    pub fn get_state_from_id(&self, id: usize) -> Result<&StateInstance, GridRlError> {
        self.states.get(id).ok_or(GridRlError::InvalidStateId(id))
    }

    /// Number of states in the pool.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no state was seen.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates over `(id, state)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &StateInstance)> {
        self.states.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CellEntity, StateChange};

    #[test]
    fn equal_states_share_an_id() {
        let mut pool = StatePool::new();
        let s1 = StateInstance::new((0, 0), vec![((1, 0), CellEntity::Goal)], 0);
        let s2 = StateInstance::from_changes(&[StateChange::SetEntity((1, 0), CellEntity::Goal)]);
        let other = s1.with_changes(&[StateChange::AgentLocation((1, 1))]);

        assert_eq!(pool.get_state_id(&s1), 0);
        assert_eq!(pool.get_state_id(&other), 1);
        assert_eq!(pool.get_state_id(&s2), 0);
        assert_eq!(pool.get_state_id(&s1), 0);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get_state_from_id(1).unwrap(), &other);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut pool = StatePool::new();
        let s = StateInstance::from_changes(&[]);
        assert_eq!(pool.find_state_id(&s), None);
        assert!(pool.is_empty());
        pool.get_state_id(&s);
        assert_eq!(pool.find_state_id(&s), Some(0));
        assert_eq!(
            pool.get_state_from_id(3).unwrap_err(),
            GridRlError::InvalidStateId(3)
        );
    }
}
