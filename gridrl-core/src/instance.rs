//! Stepping API of one {dynamics, agent, statistics} triple.
use crate::{
    agent::build_agent,
    record::{Record, RecordValue},
    Action, Agent, Config, HyperParameterStrategy, SearchTarget, SharedDynamics, StateInstance,
    StatisticsRecorder, TransitionInformation,
};
use anyhow::Result;
use log::trace;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// An agent acting in its own copy of a grid world.
///
/// Reaching an absorbing state ends the episode. The state stays visible until
/// the next action, which is taken from the initial state of a new episode.
///
/// One call of [`LearningInstance::step`] moves data as shown below:
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Action|B[Dynamics]
///     B -->|TransitionInformation|A
///     B -->|TransitionInformation|C[StatisticsRecorder]
/// ```
pub struct LearningInstance {
    dynamics: SharedDynamics,
    agent: Box<dyn Agent>,
    statistics: StatisticsRecorder,
    current_state_id: usize,
    episode_done: bool,
}

impl LearningInstance {
    /// Wraps an agent built on `dynamics`.
    pub fn new(dynamics: SharedDynamics, agent: Box<dyn Agent>) -> Self {
        let current_state_id = dynamics.borrow_mut().initial_state_id();
        Self {
            dynamics,
            agent,
            statistics: StatisticsRecorder::new(),
            current_state_id,
            episode_done: false,
        }
    }

    /// Builds fresh dynamics and agent for `target`.
    pub fn build(
        target: &SearchTarget,
        hyper_parameters: &mut dyn HyperParameterStrategy,
        config: &Config,
        seed: u64,
    ) -> Result<Self> {
        let dynamics = target.dynamics.build(&config.grid, seed)?;
        let agent = build_agent(
            target,
            hyper_parameters,
            dynamics.clone(),
            &config.agent,
            seed.wrapping_add(1),
        )?;
        Ok(Self::new(dynamics, agent))
    }

    /// The state the next action is taken from.
    pub fn get_current_state(&self) -> Result<StateInstance> {
        Ok(self
            .dynamics
            .borrow()
            .state_pool()
            .get_state_from_id(self.current_state_id)?
            .clone())
    }

    /// Id of the current state.
    pub fn current_state_id(&self) -> usize {
        self.current_state_id
    }

    fn start_episode_if_done(&mut self) {
        if self.episode_done {
            self.current_state_id = self.dynamics.borrow_mut().initial_state_id();
            self.episode_done = false;
        }
    }

    /// Applies `action`, lets the agent learn from it and returns what happened.
    pub fn perform_action(&mut self, action: Action) -> Result<(TransitionInformation, Record)> {
        self.start_episode_if_done();
        let previous = self.current_state_id;
        let (next, reward, is_terminal) = {
            let mut dynamics = self.dynamics.borrow_mut();
            let (next, reward) = dynamics.next_state_id(previous, action)?;
            (next, reward, dynamics.is_terminal_id(next)?)
        };

        let transition = TransitionInformation::new(previous, action, next, reward).terminal(is_terminal);
        trace!("{:?}", transition);
        self.agent.record_transition(&transition)?;
        self.statistics.record_transition(&transition);
        self.current_state_id = next;
        self.episode_done = is_terminal;

        let mut record = Record::from_scalar("reward", reward);
        record.insert("action", RecordValue::String(action.to_string()));
        record.insert("state_id", RecordValue::Scalar(next as f64));
        record.insert("is_terminal", RecordValue::Scalar(is_terminal as u8 as f64));
        Ok((transition, record))
    }

    /// Takes the action chosen by the agent.
    pub fn step(&mut self) -> Result<(TransitionInformation, Record)> {
        self.start_episode_if_done();
        let action = self.agent.evaluate_policy(self.current_state_id)?;
        self.perform_action(action)
    }

    /// Abandons the episode in progress and returns to the initial state.
    pub fn reset_state(&mut self) {
        self.current_state_id = self.dynamics.borrow_mut().initial_state_id();
        self.episode_done = false;
        self.statistics.abandon_episode();
    }

    /// Steps `iterations` times and returns the accumulated statistics.
    pub fn run(&mut self, iterations: usize) -> Result<Record> {
        for _ in 0..iterations {
            self.step()?;
        }
        Ok(self.statistics.to_record())
    }

    /// The agent.
    pub fn agent(&mut self) -> &mut dyn Agent {
        self.agent.as_mut()
    }

    /// The dynamics.
    pub fn dynamics(&self) -> &SharedDynamics {
        &self.dynamics
    }

    /// The statistics.
    pub fn statistics(&self) -> &StatisticsRecorder {
        &self.statistics
    }
}
