//! Named choices of agents, dynamics and exploration strategies.
use crate::{error::GridRlError, HyperParameter};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

macro_rules! named_option {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// All variants.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Name used in configuration files and logs.
            pub fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = GridRlError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(GridRlError::UnknownOption {
                        kind: $kind,
                        name: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// Agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentOption {
    /// Dynamic programming over the compiled distribution.
    ValueIteration,

    /// Online tabular learner.
    QLearning,
}

named_option!(AgentOption, "agent", {
    ValueIteration => "value_iteration",
    QLearning => "q_learning",
});

/// Grid worlds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicsOption {
    /// Collect every goal.
    Collection,

    /// Walk along a cliff.
    Cliff,

    /// Cross a windy field.
    Wind,
}

named_option!(DynamicsOption, "dynamics", {
    Collection => "collection",
    Cliff => "cliff",
    Wind => "wind",
});

/// Exploration strategies of [`QLearningAgent`](crate::agent::QLearningAgent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationOption {
    /// Random action with decaying probability.
    EpsilonGreedy,

    /// Optimism in the face of uncertainty.
    UpperConfidenceBound,

    /// Ensemble-based best policy identification.
    MfBpi,
}

named_option!(ExplorationOption, "exploration", {
    EpsilonGreedy => "epsilon_greedy",
    UpperConfidenceBound => "ucb",
    MfBpi => "mf_bpi",
});

impl ExplorationOption {
    /// Hyperparameters read by the strategy.
    pub fn hyper_parameters(self) -> &'static [HyperParameter] {
        match self {
            ExplorationOption::EpsilonGreedy => &[
                HyperParameter::ExplorationRatio,
                HyperParameter::ExplorationDecay,
            ],
            ExplorationOption::UpperConfidenceBound => &[HyperParameter::UcbExplorationBias],
            ExplorationOption::MfBpi => &[
                HyperParameter::MfEnsembleSize,
                HyperParameter::MfErrorSensitivity,
                HyperParameter::MfExplorationParameter,
            ],
        }
    }
}

/// An {agent, dynamics, exploration} combination that is searched and reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SearchTarget {
    /// Agent.
    pub agent: AgentOption,

    /// Grid world.
    pub dynamics: DynamicsOption,

    /// Exploration strategy, only meaningful for learning agents.
    pub exploration: Option<ExplorationOption>,
}

impl SearchTarget {
    /// Value iteration on the given world.
    pub fn value_iteration(dynamics: DynamicsOption) -> Self {
        Self {
            agent: AgentOption::ValueIteration,
            dynamics,
            exploration: None,
        }
    }

    /// Q-learning with the given exploration on the given world.
    pub fn q_learning(dynamics: DynamicsOption, exploration: ExplorationOption) -> Self {
        Self {
            agent: AgentOption::QLearning,
            dynamics,
            exploration: Some(exploration),
        }
    }

    /// Every Q-learning combination.
    pub fn all_q_learning() -> Vec<Self> {
        DynamicsOption::ALL
            .iter()
            .flat_map(|&d| {
                ExplorationOption::ALL
                    .iter()
                    .map(move |&e| Self::q_learning(d, e))
            })
            .collect()
    }

    /// Hyperparameters that influence the outcome of this target.
    pub fn tunable_parameters(&self) -> Vec<HyperParameter> {
        match self.agent {
            AgentOption::ValueIteration => vec![HyperParameter::DiscountRate],
            AgentOption::QLearning => {
                let mut params = vec![
                    HyperParameter::LearningRate,
                    HyperParameter::DiscountRate,
                    HyperParameter::InitialOptimism,
                    HyperParameter::ReplayLength,
                ];
                if let Some(e) = self.exploration {
                    params.extend_from_slice(e.hyper_parameters());
                }
                params
            }
        }
    }

    /// Returns `true` if `parameter` influences the outcome of this target.
    pub fn is_tunable(&self, parameter: HyperParameter) -> bool {
        self.tunable_parameters().contains(&parameter)
    }
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exploration {
            Some(e) if self.agent == AgentOption::QLearning => {
                write!(f, "{}/{}/{}", self.agent, self.dynamics, e)
            }
            _ => write!(f, "{}/{}", self.agent, self.dynamics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_configuration_errors() {
        assert_eq!("cliff".parse::<DynamicsOption>().unwrap(), DynamicsOption::Cliff);
        assert_eq!(
            "maze".parse::<DynamicsOption>().unwrap_err(),
            GridRlError::UnknownOption {
                kind: "dynamics",
                name: "maze".to_string()
            }
        );
        assert!("sarsa".parse::<AgentOption>().is_err());
        assert_eq!("ucb".parse::<ExplorationOption>().unwrap(), ExplorationOption::UpperConfidenceBound);
    }

    #[test]
    fn tunable_parameters_follow_the_strategy() {
        let t = SearchTarget::q_learning(DynamicsOption::Wind, ExplorationOption::MfBpi);
        assert!(t.is_tunable(HyperParameter::MfEnsembleSize));
        assert!(!t.is_tunable(HyperParameter::UcbExplorationBias));
        let vi = SearchTarget::value_iteration(DynamicsOption::Wind);
        assert_eq!(vi.tunable_parameters(), vec![HyperParameter::DiscountRate]);
        assert_eq!(SearchTarget::all_q_learning().len(), 9);
        assert_eq!(t.to_string(), "q_learning/wind/mf_bpi");
    }
}
