use super::{bootstrap, Report, ReportGeneratorConfig, ReportPoint, ReportState};
use crate::util::{is_set, lock, replace, set};
use anyhow::{bail, Result};
use gridrl_core::{
    error::GridRlError, ConfigHyperParameters, Evaluator, HyperParameter, ParameterEvaluator,
    SweepHyperParameters,
};
use log::{info, warn};
use rand::{rngs::SmallRng, SeedableRng};
use rayon::prelude::*;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread::JoinHandle,
};

/// Generates sensitivity reports in the background.
///
/// A report sweeps one hyperparameter of the configured target over its range
/// while the others keep their configured values. Every sample point is
/// evaluated several times on a shared thread pool and reduced to a bootstrap
/// interval of the mean reward.
pub struct ReportGenerator {
    config: ReportGeneratorConfig,
    evaluator: ParameterEvaluator,
    state: Arc<Mutex<Arc<ReportState>>>,

    /// Set while pending reports are being cancelled.
    cancelled: Arc<Mutex<bool>>,

    threads: Vec<JoinHandle<()>>,
    pool: Arc<rayon::ThreadPool>,
}

impl ReportGenerator {
    /// Builds the generator and its thread pool.
    pub fn build(config: ReportGeneratorConfig, evaluator: ParameterEvaluator) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.n_workers.max(1))
            .thread_name(|ix| format!("report-{}", ix))
            .build()?;
        Ok(Self {
            config,
            evaluator,
            state: Arc::new(Mutex::new(Arc::new(ReportState::default()))),
            cancelled: Arc::new(Mutex::new(false)),
            threads: vec![],
            pool: Arc::new(pool),
        })
    }

    /// The latest snapshot.
    pub fn get_state(&self) -> Arc<ReportState> {
        lock(&self.state).clone()
    }

    /// Starts generating the report of `parameter`.
    ///
    /// Does nothing if the report is already pending or available. Fails if
    /// the target does not use `parameter`.
    pub fn generate_report(&mut self, parameter: HyperParameter) -> Result<()> {
        let target = self.config.target;
        if !target.is_tunable(parameter) {
            bail!(GridRlError::InvalidParameter(format!(
                "{} is not a parameter of {}",
                parameter, target
            )));
        }
        let current = self.get_state();
        if current.is_pending(parameter) || current.is_available(parameter) {
            return Ok(());
        }

        let values = self.sample_points(parameter)?;
        replace(&self.state, |s| s.with_pending(parameter));
        info!("Generate report of {} for {} over {} points", parameter, target, values.len());

        self.threads.retain(|h| !h.is_finished());
        let config = self.config.clone();
        let evaluator = self.evaluator.clone();
        let state = self.state.clone();
        let cancelled = self.cancelled.clone();
        let pool = self.pool.clone();
        let handle = std::thread::spawn(move || {
            match Self::run(&config, &evaluator, parameter, &values, &state, &cancelled, &pool) {
                Ok(Some(report)) => {
                    info!("Finished report of {} for {}", parameter, config.target);
                    replace(&state, |s| s.with_report(report));
                }
                Ok(None) => info!("Cancelled report of {}", parameter),
                Err(e) => {
                    warn!("Failed to generate report of {}: {}", parameter, e);
                    replace(&state, |s| s.without(parameter));
                }
            }
        });
        self.threads.push(handle);
        Ok(())
    }

    /// Cancels every pending report and waits for their threads.
    ///
    /// Finished reports are kept.
    pub fn cancel(&mut self) {
        set(&self.cancelled, true);
        self.join();
        replace(&self.state, |s| s.without_pending());
        set(&self.cancelled, false);
    }

    /// Waits until every report thread exits.
    pub fn join(&mut self) {
        for h in self.threads.drain(..) {
            if h.join().is_err() {
                warn!("A report thread panicked");
            }
        }
    }

    /// Values of `parameter` to evaluate, in increasing order.
    ///
    /// Integer parameters never get more points than their range has integers.
    fn sample_points(&self, parameter: HyperParameter) -> Result<Vec<f64>> {
        let range = self.evaluator.config().agent.range_of(parameter);
        let integer = parameter.is_integer();
        let mut n = self.config.sample_count;
        if integer {
            n = n.min(range.integer_count());
        }
        if n == 0 {
            bail!(GridRlError::InvalidParameter(format!("no sample points for {}", parameter)));
        }

        let mut values: Vec<f64> = (0..n)
            .map(|i| {
                let fraction = if n == 1 { 0.5 } else { i as f64 / (n - 1) as f64 };
                range.interpolate(fraction, integer)
            })
            .collect();
        values.dedup();
        Ok(values)
    }

    /// Evaluates every point, returning `None` if cancelled.
    fn run(
        config: &ReportGeneratorConfig,
        evaluator: &ParameterEvaluator,
        parameter: HyperParameter,
        values: &[f64],
        state: &Mutex<Arc<ReportState>>,
        cancelled: &Mutex<bool>,
        pool: &rayon::ThreadPool,
    ) -> Result<Option<Report>> {
        let total = (values.len() * config.repeats).max(1);
        let done = AtomicUsize::new(0);
        let is_cancelled = || is_set(cancelled);
        let runs = evaluator.config().evaluation.runs as u64;
        let mut points = Vec::with_capacity(values.len());

        for (ix, &value) in values.iter().enumerate() {
            // Repeats share seeds across points, so points differ only by the swept value.
            let rewards = pool.install(|| {
                (0..config.repeats)
                    .into_par_iter()
                    .map(|r| -> Result<f64> {
                        let base = ConfigHyperParameters::from_config(&evaluator.config().agent);
                        let mut hyper_parameters = SweepHyperParameters::new(base, parameter, value);
                        let seed = config.seed.wrapping_add(r as u64 * runs);
                        let reward = evaluator.evaluate_reward(
                            &config.target,
                            &mut hyper_parameters,
                            seed,
                            &is_cancelled,
                        )?;
                        let n = done.fetch_add(1, Ordering::SeqCst) + 1;
                        replace(state, |s| s.with_progress(parameter, n as f64 / total as f64));
                        Ok(reward)
                    })
                    .collect::<Result<Vec<f64>>>()
            })?;

            if is_cancelled() || rewards.iter().any(|&r| r == f64::NEG_INFINITY) {
                return Ok(None);
            }

            let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(ix as u64));
            let interval = bootstrap(&rewards, config.resamples, config.confidence, &mut rng);
            points.push(ReportPoint { value, interval });
        }

        Ok(Some(Report {
            parameter,
            target: config.target,
            points,
        }))
    }
}

impl Drop for ReportGenerator {
    fn drop(&mut self) {
        set(&self.cancelled, true);
        self.join();
    }
}
