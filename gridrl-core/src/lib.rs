#![warn(missing_docs)]
//! Reinforcement learning on small grid-world MDPs.
//!
//! A [`Dynamics`] turns a [`StateInstance`] and an [`Action`] into the next
//! state and a reward, with every state canonicalised to a dense id by its
//! [`StatePool`]. Agents implement [`Agent`]: [`ValueIterationAgent`] solves
//! the compiled [`DynamicsDistribution`] offline, [`QLearningAgent`] learns
//! online through a [`LearningInstance`]. Hyperparameters come from a
//! [`HyperParameterStrategy`] and [`ParameterEvaluator`] reduces a
//! {target, hyperparameters} pair to a mean reward.
pub mod agent;
pub mod dynamics;
pub mod error;
pub mod evaluator;
pub mod record;
pub mod statistics;

mod base;
pub use base::{
    Action, ActionValues, Agent, CellEntity, Dynamics, Location, SharedDynamics, StateChange,
    StateInstance, TransitionInformation, ValueTable,
};

mod config;
pub use config::{
    AgentConfig, Config, EvaluationConfig, GridConfig, QTableInitialisation, RewardConfig,
    SolverBackend,
};

mod hyper_parameter;
pub use hyper_parameter::{
    ConfigHyperParameters, HyperParameter, HyperParameterStrategy, ParameterRange,
    RandomHyperParameters, SweepHyperParameters,
};

mod instance;
pub use instance::LearningInstance;

mod normaliser;
pub use normaliser::{ValueNormaliser, ValueNormaliserFactory};

mod options;
pub use options::{AgentOption, DynamicsOption, ExplorationOption, SearchTarget};

mod state_pool;
pub use state_pool::StatePool;

pub use agent::{build_agent, DynamicQTable, QLearningAgent, ReplayQueue, ValueIterationAgent};
pub use dynamics::{
    CliffDynamics, CollectionDynamics, DistributionResult, DynamicsDistribution, WindDynamics,
};
pub use evaluator::{Evaluator, ParameterEvaluator};
pub use statistics::{Statistics, StatisticsRecorder};
