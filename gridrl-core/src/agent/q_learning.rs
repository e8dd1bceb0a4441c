use super::{DynamicQTable, Explorer, ReplayQueue};
use crate::{
    error::GridRlError, Action, Agent, AgentConfig, ExplorationOption, HyperParameter,
    HyperParameterStrategy, SharedDynamics, TransitionInformation, ValueTable,
};
use anyhow::Result;
use log::trace;

/// Online tabular learner.
///
/// Each transition is first backed up by the explorer, then queued and the
/// whole replay queue is backed up again from the newest transition to the
/// oldest.
pub struct QLearningAgent {
    dynamics: SharedDynamics,
    table: DynamicQTable,
    explorer: Explorer,
    replay: ReplayQueue,
    discount_rate: f64,
}

impl QLearningAgent {
    /// Builds the agent, reading its hyperparameters from `hyper_parameters`.
    pub fn build(
        dynamics: SharedDynamics,
        exploration: ExplorationOption,
        hyper_parameters: &mut dyn HyperParameterStrategy,
        config: &AgentConfig,
        seed: u64,
    ) -> Result<Self> {
        let learning_rate = hyper_parameters.get_value(HyperParameter::LearningRate)?;
        let discount_rate = hyper_parameters.get_value(HyperParameter::DiscountRate)?;
        let initial_optimism = hyper_parameters.get_value(HyperParameter::InitialOptimism)?;
        let replay_length = hyper_parameters.get_integer_value(HyperParameter::ReplayLength)?;

        Ok(Self {
            dynamics,
            table: DynamicQTable::new(
                config.q_table_initialisation,
                initial_optimism,
                learning_rate,
                seed,
            ),
            explorer: Explorer::build(exploration, hyper_parameters, seed.wrapping_add(1))?,
            replay: ReplayQueue::new(replay_length.max(0) as usize),
            discount_rate,
        })
    }

    fn check_state_id(&self, state_id: usize) -> Result<(), GridRlError> {
        self.dynamics
            .borrow()
            .state_pool()
            .get_state_from_id(state_id)
            .map(|_| ())
    }

    /// The explorer.
    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    /// The replay queue.
    pub fn replay_queue(&self) -> &ReplayQueue {
        &self.replay
    }
}

impl Agent for QLearningAgent {
    fn get_value_table(&mut self) -> Result<ValueTable> {
        let len = self.dynamics.borrow().state_pool().len();
        let mut values = vec![None; len];
        for s in self.table.known_states().collect::<Vec<_>>() {
            if s < len {
                values[s] = Some(self.table.max_value(s));
            }
        }
        Ok(ValueTable::new(values))
    }

    fn get_state_value(&mut self, state_id: usize) -> Result<f64> {
        self.check_state_id(state_id)?;
        Ok(self.table.max_value(state_id))
    }

    fn get_state_action_value(&mut self, state_id: usize, action: Action) -> Result<f64> {
        self.check_state_id(state_id)?;
        Ok(self.table.get_value(state_id, action))
    }

    fn evaluate_policy(&mut self, state_id: usize) -> Result<Action> {
        self.check_state_id(state_id)?;
        Ok(self.explorer.select_action(&mut self.table, state_id))
    }

    fn record_transition(&mut self, transition: &TransitionInformation) -> Result<()> {
        trace!("Record {:?}", transition);
        self.explorer
            .record_transition(&mut self.table, transition, self.discount_rate);
        self.replay.push(*transition);
        self.replay.replay(&mut self.table, self.discount_rate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AgentConfig, CliffDynamics, ConfigHyperParameters, GridConfig,
        QTableInitialisation,
    };
    use std::{cell::RefCell, rc::Rc};

    fn agent(exploration: ExplorationOption, replay_length: f64) -> (SharedDynamics, QLearningAgent) {
        let dynamics: SharedDynamics =
            Rc::new(RefCell::new(CliffDynamics::build(&GridConfig::default()).unwrap()));
        let config = AgentConfig::default()
            .q_table_initialisation(QTableInitialisation::Optimistic)
            .hyper_parameter(HyperParameter::InitialOptimism, 0.0)
            .hyper_parameter(HyperParameter::LearningRate, 0.5)
            .hyper_parameter(HyperParameter::ReplayLength, replay_length);
        let mut hp = ConfigHyperParameters::from_config(&config);
        let agent =
            QLearningAgent::build(dynamics.clone(), exploration, &mut hp, &config, 0).unwrap();
        (dynamics, agent)
    }

    #[test]
    fn unknown_states_are_rejected() {
        let (_, mut agent) = agent(ExplorationOption::EpsilonGreedy, 4.0);
        assert!(agent.get_state_value(0).is_err());
        assert!(agent.evaluate_policy(3).is_err());
        assert!(agent.get_value_table().unwrap().is_empty());
    }

    #[test]
    fn transitions_update_values_and_queue() {
        let (dynamics, mut agent) = agent(ExplorationOption::UpperConfidenceBound, 2.0);
        let s0 = dynamics.borrow_mut().initial_state_id();
        let (s1, r) = dynamics.borrow_mut().next_state_id(s0, Action::Right).unwrap();
        let terminal = dynamics.borrow().is_terminal_id(s1).unwrap();
        assert!(terminal);

        let t = TransitionInformation::new(s0, Action::Right, s1, r).terminal(terminal);
        for _ in 0..3 {
            agent.record_transition(&t).unwrap();
        }
        assert_eq!(agent.replay_queue().len(), 2);

        // Explorer backups plus replays of a queue of 1, 2 and 2 transitions.
        let expected = -101.0 * (1.0 - 0.5f64.powi(8));
        let v = agent.get_state_action_value(s0, Action::Right).unwrap();
        assert!((v - expected).abs() < 1e-9, "v = {}", v);

        let table = agent.get_value_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(s0), Some(0.0));
        assert_eq!(table.get(s1), None);
    }

    #[test]
    fn policy_comes_from_the_explorer() {
        let (dynamics, mut agent) = agent(ExplorationOption::MfBpi, 1.0);
        let s0 = dynamics.borrow_mut().initial_state_id();
        for _ in 0..20 {
            let a = agent.evaluate_policy(s0).unwrap();
            assert!(Action::ALL.contains(&a));
        }
        assert_eq!(agent.explorer().option(), ExplorationOption::MfBpi);
    }
}
