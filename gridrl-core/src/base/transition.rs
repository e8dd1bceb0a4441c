//! Unit of experience passed from stepping to learners.
use super::Action;

/// Represents a transition `(s_t, a_t, s_t+1, r_t)` in terms of state ids.
///
/// Ids are only meaningful within the [`StatePool`](crate::StatePool) of the
/// dynamics that produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionInformation {
    /// State before the action.
    pub previous_state_id: usize,

    /// Action taken.
    pub previous_action: Action,

    /// State after the action.
    pub new_state_id: usize,

    /// Reward received.
    pub reward: f64,

    /// Flag denoting that `new_state_id` is absorbing.
    ///
    /// Learners bootstrap nothing from absorbing states.
    pub is_terminal: bool,
}

impl TransitionInformation {
    /// Constructs a non-terminal transition.
    pub fn new(previous_state_id: usize, previous_action: Action, new_state_id: usize, reward: f64) -> Self {
        Self {
            previous_state_id,
            previous_action,
            new_state_id,
            reward,
            is_terminal: false,
        }
    }

    /// Marks whether the new state is absorbing.
    pub fn terminal(mut self, is_terminal: bool) -> Self {
        self.is_terminal = is_terminal;
        self
    }
}
