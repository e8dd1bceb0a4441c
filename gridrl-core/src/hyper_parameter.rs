//! Numeric knobs of agents and where their values come from.
//!
//! Agents read their hyperparameters through [`HyperParameterStrategy`] and never
//! know whether a value was configured, sampled, or swept.
mod base;
mod fixed;
mod random;
mod sweep;
pub use base::{HyperParameter, ParameterRange};
pub use fixed::ConfigHyperParameters;
pub use random::RandomHyperParameters;
pub use sweep::SweepHyperParameters;

use crate::error::GridRlError;

/// Supplies hyperparameter values.
pub trait HyperParameterStrategy {
    /// Returns the value of `parameter`.
    fn get_value(&mut self, parameter: HyperParameter) -> Result<f64, GridRlError>;

    /// Returns the value of `parameter` as an integer.
    ///
    /// Fails if the value has a fractional part.
    fn get_integer_value(&mut self, parameter: HyperParameter) -> Result<i64, GridRlError> {
        let value = self.get_value(parameter)?;
        if value.is_finite() && value.fract() == 0.0 {
            Ok(value as i64)
        } else {
            Err(GridRlError::NonIntegralValue {
                parameter: parameter.to_string(),
                value,
            })
        }
    }
}

impl<T: HyperParameterStrategy + ?Sized> HyperParameterStrategy for &mut T {
    fn get_value(&mut self, parameter: HyperParameter) -> Result<f64, GridRlError> {
        (**self).get_value(parameter)
    }
}
