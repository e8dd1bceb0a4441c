use super::Evaluator;
use crate::{
    record::{Record, RecordValue},
    statistics::TOTAL_REWARD, Config, HyperParameterStrategy, LearningInstance,
    SearchTarget,
};
use anyhow::Result;
use chrono::Local;
use log::debug;

/// Runs fresh learning instances for a fixed number of steps.
///
/// Every run builds its own dynamics and agent, seeded with the evaluation
/// seed plus the run index.
#[derive(Debug, Clone)]
pub struct ParameterEvaluator {
    config: Config,
}

impl ParameterEvaluator {
    /// Constructs the evaluator.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration runs are built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Steps one fresh instance and returns its statistics.
    ///
    /// The record also carries the target and the time the run finished.
    pub fn single_run(
        &self,
        target: &SearchTarget,
        hyper_parameters: &mut dyn HyperParameterStrategy,
        seed: u64,
    ) -> Result<Record> {
        let mut instance = LearningInstance::build(target, hyper_parameters, &self.config, seed)?;
        let mut record = instance.run(self.config.evaluation.iterations)?;
        record.merge_inplace(Record::from_slice(&[
            ("target", RecordValue::String(target.to_string())),
            ("finished_at", RecordValue::DateTime(Local::now())),
        ]));
        Ok(record)
    }
}

impl Evaluator for ParameterEvaluator {
    fn evaluate_reward(
        &self,
        target: &SearchTarget,
        hyper_parameters: &mut dyn HyperParameterStrategy,
        seed: u64,
        is_cancelled: &dyn Fn() -> bool,
    ) -> Result<f64> {
        let runs = self.config.evaluation.runs.max(1);
        let mut total = 0.0;
        for ix in 0..runs {
            if is_cancelled() {
                debug!("Evaluation of {} cancelled before run {}", target, ix);
                return Ok(f64::NEG_INFINITY);
            }
            let record = self.single_run(target, hyper_parameters, seed.wrapping_add(ix as u64))?;
            total += record.get_scalar(TOTAL_REWARD)?;
        }
        Ok(total / runs as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ConfigHyperParameters, DynamicsOption, EvaluationConfig, ExplorationOption,
        RandomHyperParameters,
    };
    use std::cell::Cell;

    fn evaluator() -> ParameterEvaluator {
        ParameterEvaluator::new(
            Config::default().evaluation(EvaluationConfig::default().iterations(60).runs(3)),
        )
    }

    #[test]
    fn cancellation_returns_the_sentinel() {
        let evaluator = evaluator();
        let target = SearchTarget::q_learning(DynamicsOption::Cliff, ExplorationOption::EpsilonGreedy);
        let mut hp = ConfigHyperParameters::from_config(&evaluator.config().agent);
        let reward = evaluator.evaluate_reward(&target, &mut hp, 0, &|| true).unwrap();
        assert_eq!(reward, f64::NEG_INFINITY);

        // Cancelled after the first run.
        let polls = Cell::new(0);
        let reward = evaluator
            .evaluate_reward(&target, &mut hp, 0, &|| {
                polls.set(polls.get() + 1);
                polls.get() > 1
            })
            .unwrap();
        assert_eq!(reward, f64::NEG_INFINITY);
        assert_eq!(polls.get(), 2);
    }

    #[test]
    fn runs_are_averaged() {
        let evaluator = evaluator();
        let target = SearchTarget::value_iteration(DynamicsOption::Cliff);
        let mut hp = ConfigHyperParameters::from_config(&evaluator.config().agent);
        let record = evaluator.single_run(&target, &mut hp, 0).unwrap();
        let single = record.get_scalar(TOTAL_REWARD).unwrap();
        assert_eq!(record.get_string("target").unwrap(), "value_iteration/cliff");
        assert!(matches!(record.get("finished_at"), Some(RecordValue::DateTime(_))));

        // Ten optimal episodes of return 4.
        assert_eq!(single, 40.0);
        let mean = evaluator.evaluate_reward(&target, &mut hp, 0, &|| false).unwrap();
        assert_eq!(mean, single);
    }

    #[test]
    fn random_parameters_stay_fixed_across_runs() {
        let evaluator = evaluator();
        let target = SearchTarget::q_learning(DynamicsOption::Wind, ExplorationOption::MfBpi);
        let ranges = target
            .tunable_parameters()
            .into_iter()
            .chain(std::iter::once(crate::HyperParameter::DiscountRate))
            .map(|p| (p, p.default_range()))
            .collect();
        let mut hp = RandomHyperParameters::new(ranges, 1);
        let reward = evaluator.evaluate_reward(&target, &mut hp, 0, &|| false).unwrap();
        assert!(reward.is_finite());
        assert_eq!(hp.sampled().len(), target.tunable_parameters().len());
    }
}
