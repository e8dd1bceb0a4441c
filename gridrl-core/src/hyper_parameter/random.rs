use super::{HyperParameter, HyperParameterStrategy, ParameterRange};
use crate::error::GridRlError;
use std::collections::BTreeMap;

/// Values drawn uniformly from configured ranges.
///
/// Each parameter is sampled on its first request and the value is kept for
/// the lifetime of the instance.
pub struct RandomHyperParameters {
    ranges: BTreeMap<HyperParameter, ParameterRange>,
    values: BTreeMap<HyperParameter, f64>,
    rng: fastrand::Rng,
}

impl RandomHyperParameters {
    /// Constructs the strategy.
    pub fn new(ranges: BTreeMap<HyperParameter, ParameterRange>, seed: u64) -> Self {
        Self {
            ranges,
            values: BTreeMap::new(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Values sampled so far.
    pub fn sampled(&self) -> &BTreeMap<HyperParameter, f64> {
        &self.values
    }
}

impl HyperParameterStrategy for RandomHyperParameters {
    fn get_value(&mut self, parameter: HyperParameter) -> Result<f64, GridRlError> {
        if let Some(&v) = self.values.get(&parameter) {
            return Ok(v);
        }
        let range = self
            .ranges
            .get(&parameter)
            .ok_or_else(|| GridRlError::UnknownHyperParameter(parameter.to_string()))?;
        let v = range.sample(&mut self.rng, parameter.is_integer());
        self.values.insert(parameter, v);
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> BTreeMap<HyperParameter, ParameterRange> {
        HyperParameter::ALL.iter().map(|&p| (p, p.default_range())).collect()
    }

    #[test]
    fn samples_are_memoised() {
        let mut hp = RandomHyperParameters::new(ranges(), 11);
        let first = hp.get_value(HyperParameter::LearningRate).unwrap();
        for _ in 0..10 {
            assert_eq!(hp.get_value(HyperParameter::LearningRate).unwrap(), first);
        }
        assert!(HyperParameter::LearningRate.default_range().contains(first));
        assert_eq!(hp.sampled().len(), 1);
    }

    #[test]
    fn integer_parameters_are_integral() {
        for seed in 0..50 {
            let mut hp = RandomHyperParameters::new(ranges(), seed);
            let n = hp.get_integer_value(HyperParameter::MfEnsembleSize).unwrap();
            assert!((2..=20).contains(&n));
        }
    }

    #[test]
    fn unranged_parameters_are_errors() {
        let mut hp = RandomHyperParameters::new(BTreeMap::new(), 0);
        assert!(hp.get_value(HyperParameter::DiscountRate).is_err());
    }
}
