//! Configuration of grid worlds, agents and evaluation.
use crate::{HyperParameter, Location, ParameterRange};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Rewards paid by the grid worlds.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RewardConfig {
    /// Paid on every move.
    pub step: f64,

    /// Paid on reaching a goal cell.
    pub goal: f64,

    /// Paid on entering a hazard cell.
    pub hazard: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step: -1.0,
            goal: 10.0,
            hazard: -100.0,
        }
    }
}

/// Layout of the grid worlds.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct GridConfig {
    /// Number of columns.
    pub width: i32,

    /// Number of rows.
    pub height: i32,

    /// Where the agent starts.
    pub initial_agent_location: Location,

    /// Moves the agent can make before the episode ends, unlimited if `None`.
    ///
    /// Only used by the collection world.
    pub agent_energy: Option<i32>,

    /// Goals scattered by the collection world.
    pub goal_count: usize,

    /// Hazards scattered by the collection world.
    pub hazard_count: usize,

    /// Probability that a wind cell pushes the agent.
    pub wind_probability: f64,

    /// Seed of the scattered layout.
    pub layout_seed: u64,

    /// Rewards.
    pub rewards: RewardConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 4,
            initial_agent_location: (0, 3),
            agent_energy: None,
            goal_count: 3,
            hazard_count: 1,
            wind_probability: 0.3,
            layout_seed: 7,
            rewards: RewardConfig::default(),
        }
    }
}

impl GridConfig {
    /// Sets the grid size.
    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the initial agent location.
    pub fn initial_agent_location(mut self, v: Location) -> Self {
        self.initial_agent_location = v;
        self
    }

    /// Sets the energy of the agent.
    pub fn agent_energy(mut self, v: Option<i32>) -> Self {
        self.agent_energy = v;
        self
    }

    /// Sets the number of goals.
    pub fn goal_count(mut self, v: usize) -> Self {
        self.goal_count = v;
        self
    }

    /// Sets the number of hazards.
    pub fn hazard_count(mut self, v: usize) -> Self {
        self.hazard_count = v;
        self
    }

    /// Sets the wind probability.
    pub fn wind_probability(mut self, v: f64) -> Self {
        self.wind_probability = v;
        self
    }

    /// Sets the seed of the scattered layout.
    pub fn layout_seed(mut self, v: u64) -> Self {
        self.layout_seed = v;
        self
    }

    /// Sets the rewards.
    pub fn rewards(mut self, v: RewardConfig) -> Self {
        self.rewards = v;
        self
    }
}

/// Implementation of the Bellman backup used by value iteration.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// Walks the nested maps of the compiled distribution.
    Dictionary,

    /// Walks the flattened arrays of the compiled distribution.
    Flattened,
}

/// Default of Q-table entries on first read.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum QTableInitialisation {
    /// Exactly the initial optimism.
    Optimistic,

    /// Uniform in `[0, initial optimism)`.
    Random,
}

/// Configuration shared by all agents.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct AgentConfig {
    /// Value iteration stops once a sweep changes no value by more than this.
    pub stopping_epsilon: f64,

    /// Samples drawn per state-action pair when compiling stochastic dynamics.
    pub distribution_sample_count: usize,

    /// Bellman backup implementation.
    pub solver_backend: SolverBackend,

    /// Default of Q-table entries.
    pub q_table_initialisation: QTableInitialisation,

    /// Fixed hyperparameter values.
    pub hyper_parameters: BTreeMap<HyperParameter, f64>,

    /// Ranges explored by search and reports.
    pub ranges: BTreeMap<HyperParameter, ParameterRange>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            stopping_epsilon: 1e-6,
            distribution_sample_count: 100,
            solver_backend: SolverBackend::Dictionary,
            q_table_initialisation: QTableInitialisation::Optimistic,
            hyper_parameters: HyperParameter::ALL
                .iter()
                .map(|&p| (p, p.default_value()))
                .collect(),
            ranges: HyperParameter::ALL
                .iter()
                .map(|&p| (p, p.default_range()))
                .collect(),
        }
    }
}

impl AgentConfig {
    /// Sets the stopping threshold of value iteration.
    pub fn stopping_epsilon(mut self, v: f64) -> Self {
        self.stopping_epsilon = v;
        self
    }

    /// Sets the number of samples per state-action pair.
    pub fn distribution_sample_count(mut self, v: usize) -> Self {
        self.distribution_sample_count = v;
        self
    }

    /// Sets the Bellman backup implementation.
    pub fn solver_backend(mut self, v: SolverBackend) -> Self {
        self.solver_backend = v;
        self
    }

    /// Sets the default of Q-table entries.
    pub fn q_table_initialisation(mut self, v: QTableInitialisation) -> Self {
        self.q_table_initialisation = v;
        self
    }

    /// Sets the fixed value of a hyperparameter.
    pub fn hyper_parameter(mut self, parameter: HyperParameter, v: f64) -> Self {
        self.hyper_parameters.insert(parameter, v);
        self
    }

    /// Sets the range of a hyperparameter.
    pub fn range(mut self, parameter: HyperParameter, range: ParameterRange) -> Self {
        self.ranges.insert(parameter, range);
        self
    }

    /// Range of a hyperparameter, falling back to its default.
    pub fn range_of(&self, parameter: HyperParameter) -> ParameterRange {
        self.ranges
            .get(&parameter)
            .copied()
            .unwrap_or_else(|| parameter.default_range())
    }
}

/// How a single configuration is measured.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EvaluationConfig {
    /// Steps taken in one run.
    pub iterations: usize,

    /// Independent runs averaged per evaluation.
    pub runs: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            runs: 5,
        }
    }
}

impl EvaluationConfig {
    /// Sets the steps per run.
    pub fn iterations(mut self, v: usize) -> Self {
        self.iterations = v;
        self
    }

    /// Sets the runs per evaluation.
    pub fn runs(mut self, v: usize) -> Self {
        self.runs = v;
        self
    }
}

/// Configuration handed to every component by reference.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct Config {
    /// Grid worlds.
    pub grid: GridConfig,

    /// Agents.
    pub agent: AgentConfig,

    /// Evaluation of a configuration.
    pub evaluation: EvaluationConfig,
}

impl Config {
    /// Sets the grid configuration.
    pub fn grid(mut self, v: GridConfig) -> Self {
        self.grid = v;
        self
    }

    /// Sets the agent configuration.
    pub fn agent(mut self, v: AgentConfig) -> Self {
        self.agent = v;
        self
    }

    /// Sets the evaluation configuration.
    pub fn evaluation(mut self, v: EvaluationConfig) -> Self {
        self.evaluation = v;
        self
    }

    /// Constructs [`Config`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`Config`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_config() -> Result<()> {
        let config = Config::default()
            .grid(GridConfig::default().size(3, 2).agent_energy(Some(6)))
            .agent(
                AgentConfig::default()
                    .solver_backend(SolverBackend::Flattened)
                    .hyper_parameter(HyperParameter::LearningRate, 0.5)
                    .range(HyperParameter::ReplayLength, ParameterRange::new(1.0, 4.0)),
            )
            .evaluation(EvaluationConfig::default().runs(2));

        let dir = TempDir::new("gridrl_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;
        let loaded = Config::load(&path)?;
        assert_eq!(config, loaded);
        Ok(())
    }

    #[test]
    fn missing_ranges_fall_back_to_defaults() {
        let mut config = AgentConfig::default();
        config.ranges.clear();
        assert_eq!(
            config.range_of(HyperParameter::DiscountRate),
            HyperParameter::DiscountRate.default_range()
        );
    }
}
