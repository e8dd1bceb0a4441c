//! Dynamics of a grid world, typically an MDP.
use super::{Action, StateInstance};
use crate::{error::GridRlError, StatePool};
use std::{cell::RefCell, rc::Rc};

/// Dynamics shared by the agent and the stepping loop of one worker.
pub type SharedDynamics = Rc<RefCell<dyn Dynamics>>;

/// Represents the transition and reward model of a grid world.
///
/// [`Dynamics::next`] must depend only on the given state and action. Every
/// implementation owns the [`StatePool`] that issues the ids used by the
/// id-based helpers.
pub trait Dynamics {
    /// Returns `true` if [`Dynamics::next`] may return different outcomes for the same input.
    fn is_stochastic(&self) -> bool;

    /// The state an episode starts from.
    fn initial_state(&self) -> StateInstance;

    /// Applies `action` in `state`, returning the next state and the reward.
    fn next(&mut self, state: &StateInstance, action: Action) -> (StateInstance, f64);

    /// Returns `true` if `state` is absorbing.
    fn is_terminal(&self, _state: &StateInstance) -> bool {
        false
    }

    /// An upper bound of the number of reachable states, if known.
    fn state_count_upper_bound(&self) -> Option<usize> {
        None
    }

    /// Pool of states seen so far.
    fn state_pool(&self) -> &StatePool;

    /// Mutable pool of states seen so far.
    fn state_pool_mut(&mut self) -> &mut StatePool;

    /// Id of the initial state.
    fn initial_state_id(&mut self) -> usize {
        let state = self.initial_state();
        self.state_pool_mut().get_state_id(&state)
    }

    /// Applies `action` in the state with the given id.
    fn next_state_id(&mut self, state_id: usize, action: Action) -> Result<(usize, f64), GridRlError> {
        let state = self.state_pool().get_state_from_id(state_id)?.clone();
        let (next, reward) = self.next(&state, action);
        Ok((self.state_pool_mut().get_state_id(&next), reward))
    }

    /// Returns `true` if the state with the given id is absorbing.
    fn is_terminal_id(&self, state_id: usize) -> Result<bool, GridRlError> {
        Ok(self.is_terminal(self.state_pool().get_state_from_id(state_id)?))
    }
}
