use crate::error::GridRlError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Tunable knobs of the agents and exploration strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HyperParameter {
    /// Step size of the Q-table moving average.
    LearningRate,

    /// Discount of future rewards.
    DiscountRate,

    /// Default value of Q-table entries on first read.
    InitialOptimism,

    /// Capacity of the replay queue.
    ReplayLength,

    /// Initial probability of a random action in epsilon-greedy exploration.
    ExplorationRatio,

    /// Geometric decay of the exploration ratio per transition.
    ExplorationDecay,

    /// Weight of the confidence bonus in upper-confidence-bound exploration.
    UcbExplorationBias,

    /// Number of Q-tables in the MF-BPI ensemble.
    MfEnsembleSize,

    /// Order `k` of the TD-error moment tracked by MF-BPI.
    MfErrorSensitivity,

    /// Scale of the forced exploration of MF-BPI.
    MfExplorationParameter,
}

impl HyperParameter {
    /// All hyperparameters.
    pub const ALL: [HyperParameter; 10] = [
        HyperParameter::LearningRate,
        HyperParameter::DiscountRate,
        HyperParameter::InitialOptimism,
        HyperParameter::ReplayLength,
        HyperParameter::ExplorationRatio,
        HyperParameter::ExplorationDecay,
        HyperParameter::UcbExplorationBias,
        HyperParameter::MfEnsembleSize,
        HyperParameter::MfErrorSensitivity,
        HyperParameter::MfExplorationParameter,
    ];

    /// Name used in configuration files and logs.
    pub fn name(self) -> &'static str {
        match self {
            HyperParameter::LearningRate => "learning_rate",
            HyperParameter::DiscountRate => "discount_rate",
            HyperParameter::InitialOptimism => "initial_optimism",
            HyperParameter::ReplayLength => "replay_length",
            HyperParameter::ExplorationRatio => "exploration_ratio",
            HyperParameter::ExplorationDecay => "exploration_decay",
            HyperParameter::UcbExplorationBias => "ucb_exploration_bias",
            HyperParameter::MfEnsembleSize => "mf_ensemble_size",
            HyperParameter::MfErrorSensitivity => "mf_error_sensitivity",
            HyperParameter::MfExplorationParameter => "mf_exploration_parameter",
        }
    }

    /// Returns `true` if the parameter only takes integer values.
    pub fn is_integer(self) -> bool {
        matches!(self, HyperParameter::ReplayLength | HyperParameter::MfEnsembleSize)
    }

    /// Range used when none is configured.
    pub fn default_range(self) -> ParameterRange {
        let (min, max) = match self {
            HyperParameter::LearningRate => (0.01, 1.0),
            HyperParameter::DiscountRate => (0.5, 0.99),
            HyperParameter::InitialOptimism => (0.0, 10.0),
            HyperParameter::ReplayLength => (1.0, 32.0),
            HyperParameter::ExplorationRatio => (0.01, 1.0),
            HyperParameter::ExplorationDecay => (0.9, 1.0),
            HyperParameter::UcbExplorationBias => (0.01, 10.0),
            HyperParameter::MfEnsembleSize => (2.0, 20.0),
            HyperParameter::MfErrorSensitivity => (1.0, 4.0),
            HyperParameter::MfExplorationParameter => (0.1, 2.0),
        };
        ParameterRange::new(min, max)
    }

    /// Value used when none is configured.
    pub fn default_value(self) -> f64 {
        match self {
            HyperParameter::LearningRate => 0.1,
            HyperParameter::DiscountRate => 0.9,
            HyperParameter::InitialOptimism => 1.0,
            HyperParameter::ReplayLength => 8.0,
            HyperParameter::ExplorationRatio => 0.5,
            HyperParameter::ExplorationDecay => 0.999,
            HyperParameter::UcbExplorationBias => 1.0,
            HyperParameter::MfEnsembleSize => 10.0,
            HyperParameter::MfErrorSensitivity => 2.0,
            HyperParameter::MfExplorationParameter => 1.0,
        }
    }
}

impl fmt::Display for HyperParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HyperParameter {
    type Err = GridRlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| GridRlError::UnknownHyperParameter(s.to_string()))
    }
}

/// Closed interval `[min, max]` of a hyperparameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    /// Lower bound.
    pub min: f64,

    /// Upper bound.
    pub max: f64,
}

impl ParameterRange {
    /// Constructs a range; the bounds are swapped if given in reverse.
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Returns `true` if `value` lies in the range.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Number of distinct integers in the range.
    pub fn integer_count(&self) -> usize {
        let lo = self.min.ceil();
        let hi = self.max.floor();
        if hi < lo {
            0
        } else {
            (hi - lo) as usize + 1
        }
    }

    /// Point at `fraction` of the way from `min` to `max`, rounded if `integer`.
    pub fn interpolate(&self, fraction: f64, integer: bool) -> f64 {
        let value = self.min + fraction * (self.max - self.min);
        if integer {
            value.round().max(self.min.ceil()).min(self.max.floor())
        } else {
            value
        }
    }

    /// Draws a value uniformly from the range, rounded if `integer`.
    pub fn sample(&self, rng: &mut fastrand::Rng, integer: bool) -> f64 {
        self.interpolate(rng.f64(), integer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for p in HyperParameter::ALL {
            assert_eq!(p.name().parse::<HyperParameter>().unwrap(), p);
            assert!(p.default_range().contains(p.default_value()), "{}", p);
        }
        assert_eq!(
            "momentum".parse::<HyperParameter>().unwrap_err(),
            GridRlError::UnknownHyperParameter("momentum".to_string())
        );
    }

    #[test]
    fn integer_sampling_stays_in_range() {
        let range = ParameterRange::new(2.0, 5.0);
        assert_eq!(range.integer_count(), 4);
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..200 {
            let v = range.sample(&mut rng, true);
            assert!(range.contains(v));
            assert_eq!(v.fract(), 0.0);
        }
    }
}
