use super::{HyperParameter, HyperParameterStrategy};
use crate::{error::GridRlError, AgentConfig};
use std::collections::BTreeMap;

/// Values taken from the configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigHyperParameters {
    values: BTreeMap<HyperParameter, f64>,
}

impl ConfigHyperParameters {
    /// Constructs the strategy from explicit values.
    pub fn new(values: BTreeMap<HyperParameter, f64>) -> Self {
        Self { values }
    }

    /// Constructs the strategy from the defaults of an agent configuration.
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.hyper_parameters.clone())
    }
}

impl HyperParameterStrategy for ConfigHyperParameters {
    fn get_value(&mut self, parameter: HyperParameter) -> Result<f64, GridRlError> {
        self.values
            .get(&parameter)
            .copied()
            .ok_or_else(|| GridRlError::UnknownHyperParameter(parameter.to_string()))
    }
}
