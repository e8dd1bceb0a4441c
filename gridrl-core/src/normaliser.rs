//! Rescaling of agent values for display.
use crate::{Action, Agent, CellEntity, Location, SharedDynamics};
use anyhow::Result;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

/// Maps values of one entity layout onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueNormaliser {
    min: f64,
    max: f64,
}

impl ValueNormaliser {
    /// Constructs a normaliser mapping `min` to 0 and `max` to 1.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Smallest known value.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest known value.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Rescales `value`. A degenerate range maps everything to 0.
    pub fn normalise(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range > 0.0 && range.is_finite() {
            (value - self.min) / range
        } else {
            0.0
        }
    }
}

/// Builds and caches [`ValueNormaliser`]s per entity layout.
///
/// The range of a layout covers the state values and the action values of
/// every pooled state with that layout, whatever the agent location. Once a
/// layout has a normaliser it is served from the cache even if the agent's
/// values change later, which suits solved agents. Call
/// [`ValueNormaliserFactory::clear`] after further learning.
#[derive(Debug, Default)]
pub struct ValueNormaliserFactory {
    cache: HashMap<Arc<BTreeMap<Location, CellEntity>>, ValueNormaliser>,
}

impl ValueNormaliserFactory {
    /// Constructs an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normaliser of the layout of `state_id`.
    pub fn get_normaliser(
        &mut self,
        agent: &mut dyn Agent,
        dynamics: &SharedDynamics,
        state_id: usize,
    ) -> Result<ValueNormaliser> {
        let (layout, state_ids) = {
            let dynamics = dynamics.borrow();
            let pool = dynamics.state_pool();
            let layout = pool.get_state_from_id(state_id)?.layout();
            let ids: Vec<_> = pool
                .iter()
                .filter(|(_, s)| s.layout() == layout)
                .map(|(id, _)| id)
                .collect();
            (layout, ids)
        };

        if let Some(normaliser) = self.cache.get(&layout) {
            return Ok(*normaliser);
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for id in state_ids {
            let v = agent.get_state_value(id)?;
            min = min.min(v);
            max = max.max(v);
            for a in Action::ALL {
                let q = agent.get_state_action_value(id, a)?;
                min = min.min(q);
                max = max.max(q);
            }
        }

        let normaliser = ValueNormaliser::new(min, max);
        self.cache.insert(layout, normaliser);
        Ok(normaliser)
    }

    /// Number of cached layouts.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drops every cached normaliser.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_ranges_map_to_zero() {
        let normaliser = ValueNormaliser::new(2.0, 2.0);
        assert_eq!(normaliser.normalise(2.0), 0.0);
        let normaliser = ValueNormaliser::new(-1.0, 3.0);
        assert_eq!(normaliser.normalise(-1.0), 0.0);
        assert_eq!(normaliser.normalise(3.0), 1.0);
        assert_eq!(normaliser.normalise(1.0), 0.5);
    }
}
