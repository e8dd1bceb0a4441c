//! Messages from search workers to the aggregator.
use gridrl_core::{DynamicsOption, HyperParameter, SearchTarget};
use std::collections::BTreeMap;

/// Messages that the aggregator of [`RandomSearch`](crate::RandomSearch) receives.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchMessage {
    /// Mean reward of one completed evaluation.
    Result {
        /// Id of the sending worker.
        worker: usize,

        /// Evaluated target.
        target: SearchTarget,

        /// Mean total reward.
        reward: f64,

        /// Hyperparameters the evaluation was run with.
        parameters: BTreeMap<HyperParameter, f64>,
    },

    /// Reward of the optimal policy on a grid world.
    OptimalReward {
        /// Grid world.
        dynamics: DynamicsOption,

        /// Mean total reward of value iteration.
        reward: f64,
    },
}
