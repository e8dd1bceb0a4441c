//! Evaluate hyperparameters by simulation.
use crate::{HyperParameterStrategy, SearchTarget};
use anyhow::Result;
mod parameter_evaluator;
pub use parameter_evaluator::ParameterEvaluator;

/// Reduces a {target, hyperparameters} pair to a reward.
pub trait Evaluator {
    /// Mean total reward of independent runs.
    ///
    /// `is_cancelled` is polled before each run. A cancelled evaluation returns
    /// [`f64::NEG_INFINITY`] instead of an error.
    fn evaluate_reward(
        &self,
        target: &SearchTarget,
        hyper_parameters: &mut dyn HyperParameterStrategy,
        seed: u64,
        is_cancelled: &dyn Fn() -> bool,
    ) -> Result<f64>;
}
