//! Exploration strategies of [`QLearningAgent`](super::QLearningAgent).
mod epsilon_greedy;
mod mf_bpi;
mod ucb;
pub use epsilon_greedy::{EpsilonGreedy, MIN_EXPLORATION_RATIO};
pub use mf_bpi::MfBpi;
pub use ucb::UpperConfidenceBound;

use super::DynamicQTable;
use crate::{
    error::GridRlError, Action, ExplorationOption, HyperParameter, HyperParameterStrategy,
    TransitionInformation,
};

/// Explorers for Q-learning.
pub enum Explorer {
    /// Epsilon-greedy action selection.
    EpsilonGreedy(EpsilonGreedy),

    /// Upper-confidence-bound action selection.
    UpperConfidenceBound(UpperConfidenceBound),

    /// Ensemble-based best policy identification.
    MfBpi(MfBpi),
}

impl Explorer {
    /// Builds the explorer, reading its hyperparameters from `hyper_parameters`.
    pub fn build(
        option: ExplorationOption,
        hyper_parameters: &mut dyn HyperParameterStrategy,
        seed: u64,
    ) -> Result<Self, GridRlError> {
        let explorer = match option {
            ExplorationOption::EpsilonGreedy => Explorer::EpsilonGreedy(EpsilonGreedy::new(
                hyper_parameters.get_value(HyperParameter::ExplorationRatio)?,
                hyper_parameters.get_value(HyperParameter::ExplorationDecay)?,
                seed,
            )),
            ExplorationOption::UpperConfidenceBound => {
                Explorer::UpperConfidenceBound(UpperConfidenceBound::new(
                    hyper_parameters.get_value(HyperParameter::UcbExplorationBias)?,
                    seed,
                ))
            }
            ExplorationOption::MfBpi => Explorer::MfBpi(MfBpi::new(
                hyper_parameters.get_integer_value(HyperParameter::MfEnsembleSize)?.max(1) as usize,
                hyper_parameters.get_value(HyperParameter::MfErrorSensitivity)?,
                hyper_parameters.get_value(HyperParameter::MfExplorationParameter)?,
                seed,
            )),
        };
        Ok(explorer)
    }

    /// Chooses an action in `state_id`.
    pub fn select_action(&mut self, table: &mut DynamicQTable, state_id: usize) -> Action {
        match self {
            Explorer::EpsilonGreedy(e) => e.select_action(table, state_id),
            Explorer::UpperConfidenceBound(e) => e.select_action(table, state_id),
            Explorer::MfBpi(e) => e.select_action(table, state_id),
        }
    }

    /// Updates `table` and the explorer's own statistics with a transition.
    pub fn record_transition(
        &mut self,
        table: &mut DynamicQTable,
        transition: &TransitionInformation,
        discount_rate: f64,
    ) {
        match self {
            Explorer::EpsilonGreedy(e) => e.record_transition(table, transition, discount_rate),
            Explorer::UpperConfidenceBound(e) => {
                e.record_transition(table, transition, discount_rate)
            }
            Explorer::MfBpi(e) => e.record_transition(table, transition, discount_rate),
        }
    }

    /// The option this explorer was built from.
    pub fn option(&self) -> ExplorationOption {
        match self {
            Explorer::EpsilonGreedy(_) => ExplorationOption::EpsilonGreedy,
            Explorer::UpperConfidenceBound(_) => ExplorationOption::UpperConfidenceBound,
            Explorer::MfBpi(_) => ExplorationOption::MfBpi,
        }
    }
}
