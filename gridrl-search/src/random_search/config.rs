use anyhow::Result;
use gridrl_core::SearchTarget;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`RandomSearch`](crate::RandomSearch).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RandomSearchConfig {
    /// The number of search workers, besides the optimal-reward worker.
    pub n_workers: usize,

    /// Candidate targets, drawn uniformly by every worker.
    pub targets: Vec<SearchTarget>,

    /// Base seed of the workers.
    pub seed: u64,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            n_workers: 4,
            targets: SearchTarget::all_q_learning(),
            seed: 0,
        }
    }
}

impl RandomSearchConfig {
    /// Sets the number of workers.
    pub fn n_workers(mut self, v: usize) -> Self {
        self.n_workers = v;
        self
    }

    /// Sets the candidate targets.
    pub fn targets(mut self, v: Vec<SearchTarget>) -> Self {
        self.targets = v;
        self
    }

    /// Sets the base seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`RandomSearchConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RandomSearchConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
