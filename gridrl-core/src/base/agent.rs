//! Agent.
use super::{Action, TransitionInformation};
use anyhow::Result;

/// State values indexed by state id.
///
/// Ids that the agent knows nothing about hold `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueTable(Vec<Option<f64>>);

impl ValueTable {
    /// Constructs a table from per-id values.
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }

    /// Value of the given state.
    pub fn get(&self, state_id: usize) -> Option<f64> {
        self.0.get(state_id).copied().flatten()
    }

    /// Number of ids covered by the table, known or not.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the table covers no ids.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(state_id, value)` of known states.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().enumerate().filter_map(|(ix, v)| v.map(|v| (ix, v)))
    }
}

/// Represents a policy with value estimates on a grid world.
///
/// All ids are issued by the [`StatePool`](crate::StatePool) of the dynamics the
/// agent was built with.
pub trait Agent {
    /// Returns the value of every state the agent knows.
    fn get_value_table(&mut self) -> Result<ValueTable>;

    /// Returns the value of a state.
    fn get_state_value(&mut self, state_id: usize) -> Result<f64>;

    /// Returns the value of taking `action` in a state.
    fn get_state_action_value(&mut self, state_id: usize, action: Action) -> Result<f64>;

    /// Chooses an action in a state.
    fn evaluate_policy(&mut self, state_id: usize) -> Result<Action>;

    /// Learns from an observed transition.
    fn record_transition(&mut self, transition: &TransitionInformation) -> Result<()>;
}
