use anyhow::Result;
use gridrl_core::{DynamicsOption, ExplorationOption, SearchTarget};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ReportGenerator`](crate::ReportGenerator).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ReportGeneratorConfig {
    /// Target whose hyperparameters are reported on.
    pub target: SearchTarget,

    /// The number of sample points over the range of a parameter.
    ///
    /// Integer parameters use at most one point per integer of the range.
    pub sample_count: usize,

    /// The number of evaluations per sample point.
    pub repeats: usize,

    /// Size of the thread pool running the evaluations of a sample point.
    pub n_workers: usize,

    /// The number of bootstrap resamples.
    pub resamples: usize,

    /// Confidence level of the intervals, in `(0, 1)`.
    pub confidence: f64,

    /// Base seed of the evaluations.
    pub seed: u64,
}

impl Default for ReportGeneratorConfig {
    fn default() -> Self {
        Self {
            target: SearchTarget::q_learning(DynamicsOption::Collection, ExplorationOption::EpsilonGreedy),
            sample_count: 10,
            repeats: 8,
            n_workers: 4,
            resamples: 1000,
            confidence: 0.95,
            seed: 0,
        }
    }
}

impl ReportGeneratorConfig {
    /// Sets the target.
    pub fn target(mut self, v: SearchTarget) -> Self {
        self.target = v;
        self
    }

    /// Sets the number of sample points.
    pub fn sample_count(mut self, v: usize) -> Self {
        self.sample_count = v;
        self
    }

    /// Sets the number of evaluations per sample point.
    pub fn repeats(mut self, v: usize) -> Self {
        self.repeats = v;
        self
    }

    /// Sets the size of the thread pool.
    pub fn n_workers(mut self, v: usize) -> Self {
        self.n_workers = v;
        self
    }

    /// Sets the number of bootstrap resamples.
    pub fn resamples(mut self, v: usize) -> Self {
        self.resamples = v;
        self
    }

    /// Sets the confidence level.
    pub fn confidence(mut self, v: f64) -> Self {
        self.confidence = v;
        self
    }

    /// Sets the base seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`ReportGeneratorConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ReportGeneratorConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
