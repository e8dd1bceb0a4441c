//! Grid worlds and their compiled transition distributions.
mod cliff;
mod collection;
mod distribution;
mod grid;
mod wind;
pub use cliff::CliffDynamics;
pub use collection::CollectionDynamics;
pub use distribution::{ActionDistributions, DistributionResult, DynamicsDistribution, FlatDistribution};
pub use grid::Grid;
pub use wind::WindDynamics;

use crate::{DynamicsOption, GridConfig, SharedDynamics};
use anyhow::Result;
use std::{cell::RefCell, rc::Rc};

impl DynamicsOption {
    /// Builds the grid world. `seed` drives stochastic transitions only.
    pub fn build(self, config: &GridConfig, seed: u64) -> Result<SharedDynamics> {
        let dynamics: SharedDynamics = match self {
            DynamicsOption::Collection => Rc::new(RefCell::new(CollectionDynamics::build(config)?)),
            DynamicsOption::Cliff => Rc::new(RefCell::new(CliffDynamics::build(config)?)),
            DynamicsOption::Wind => Rc::new(RefCell::new(WindDynamics::build(config, seed)?)),
        };
        Ok(dynamics)
    }
}
