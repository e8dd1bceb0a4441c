//! Agents and their building blocks.
mod explorer;
mod q_learning;
mod q_table;
mod replay_queue;
mod value_iteration;
pub use explorer::{EpsilonGreedy, Explorer, MfBpi, UpperConfidenceBound, MIN_EXPLORATION_RATIO};
pub use q_learning::QLearningAgent;
pub use q_table::DynamicQTable;
pub use replay_queue::ReplayQueue;
pub use value_iteration::ValueIterationAgent;

use crate::{
    error::GridRlError, Agent, AgentConfig, AgentOption, HyperParameterStrategy, SearchTarget,
    SharedDynamics,
};
use anyhow::Result;

/// Builds the agent of `target` on `dynamics`.
///
/// Hyperparameters are read once, here. `seed` drives every random choice of
/// the agent.
pub fn build_agent(
    target: &SearchTarget,
    hyper_parameters: &mut dyn HyperParameterStrategy,
    dynamics: SharedDynamics,
    config: &AgentConfig,
    seed: u64,
) -> Result<Box<dyn Agent>> {
    let agent: Box<dyn Agent> = match target.agent {
        AgentOption::ValueIteration => Box::new(ValueIterationAgent::build(
            dynamics,
            hyper_parameters,
            config,
            seed,
        )?),
        AgentOption::QLearning => {
            let exploration = target.exploration.ok_or(GridRlError::UnknownOption {
                kind: "exploration",
                name: "none".to_string(),
            })?;
            Box::new(QLearningAgent::build(
                dynamics,
                exploration,
                hyper_parameters,
                config,
                seed,
            )?)
        }
    };
    Ok(agent)
}
