use super::{HyperParameter, HyperParameterStrategy};
use crate::error::GridRlError;

/// Overrides one parameter of a base strategy.
///
/// Used to sweep a single parameter while every other one keeps the value
/// of `base`.
pub struct SweepHyperParameters<S> {
    base: S,
    parameter: HyperParameter,
    value: f64,
}

impl<S: HyperParameterStrategy> SweepHyperParameters<S> {
    /// Constructs the strategy, answering `value` for `parameter`.
    pub fn new(base: S, parameter: HyperParameter, value: f64) -> Self {
        Self {
            base,
            parameter,
            value,
        }
    }

    /// The swept parameter.
    pub fn parameter(&self) -> HyperParameter {
        self.parameter
    }
}

impl<S: HyperParameterStrategy> HyperParameterStrategy for SweepHyperParameters<S> {
    fn get_value(&mut self, parameter: HyperParameter) -> Result<f64, GridRlError> {
        if parameter == self.parameter {
            Ok(self.value)
        } else {
            self.base.get_value(parameter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgentConfig, ConfigHyperParameters};

    #[test]
    fn only_the_swept_parameter_changes() {
        let base = ConfigHyperParameters::from_config(&AgentConfig::default());
        let mut hp = SweepHyperParameters::new(base, HyperParameter::DiscountRate, 0.5);
        assert_eq!(hp.get_value(HyperParameter::DiscountRate).unwrap(), 0.5);
        assert_eq!(
            hp.get_value(HyperParameter::LearningRate).unwrap(),
            HyperParameter::LearningRate.default_value()
        );
        assert_eq!(hp.parameter(), HyperParameter::DiscountRate);
    }
}
