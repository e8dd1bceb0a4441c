use crate::{Action, ActionValues, QTableInitialisation, TransitionInformation};
use std::collections::HashMap;
use xxhash_rust::xxh3::Xxh3Builder;

/// Tabular state-action values created on first read.
///
/// Missing entries are seeded either with the initial optimism or uniformly
/// in `[0, initial optimism)`, and every later read returns the cached value.
pub struct DynamicQTable {
    entries: HashMap<usize, [Option<f64>; Action::COUNT], Xxh3Builder>,
    initialisation: QTableInitialisation,
    initial_optimism: f64,
    learning_rate: f64,
    rng: fastrand::Rng,
}

impl DynamicQTable {
    /// Constructs an empty table.
    pub fn new(
        initialisation: QTableInitialisation,
        initial_optimism: f64,
        learning_rate: f64,
        seed: u64,
    ) -> Self {
        Self {
            entries: HashMap::default(),
            initialisation,
            initial_optimism,
            learning_rate,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    fn seed_value(&mut self) -> f64 {
        match self.initialisation {
            QTableInitialisation::Optimistic => self.initial_optimism,
            QTableInitialisation::Random => self.rng.f64() * self.initial_optimism,
        }
    }

    /// Value of `action` in `state_id`, seeding it if missing.
    pub fn get_value(&mut self, state_id: usize, action: Action) -> f64 {
        if let Some(v) = self.peek(state_id, action) {
            return v;
        }
        let v = self.seed_value();
        self.entries.entry(state_id).or_default()[action.index()] = Some(v);
        v
    }

    /// Value of `action` in `state_id` if it was ever read.
    pub fn peek(&self, state_id: usize, action: Action) -> Option<f64> {
        self.entries
            .get(&state_id)
            .and_then(|values| values[action.index()])
    }

    /// Values of every action in `state_id`.
    pub fn action_values(&mut self, state_id: usize) -> ActionValues {
        let mut values = [0.0; Action::COUNT];
        for a in Action::ALL {
            values[a.index()] = self.get_value(state_id, a);
        }
        values
    }

    /// Largest action value in `state_id`.
    pub fn max_value(&mut self, state_id: usize) -> f64 {
        self.action_values(state_id)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// First action with the largest value in `state_id`.
    pub fn best_action(&mut self, state_id: usize) -> Action {
        let values = self.action_values(state_id);
        let mut best = Action::ALL[0];
        for a in Action::ALL {
            if values[a.index()] > values[best.index()] {
                best = a;
            }
        }
        best
    }

    /// Moves the value towards `target` by the learning rate.
    pub fn update_value(&mut self, state_id: usize, action: Action, target: f64) {
        let v = self.get_value(state_id, action);
        self.entries.entry(state_id).or_default()[action.index()] =
            Some(v + self.learning_rate * (target - v));
    }

    /// One-step Q-learning backup of a transition.
    ///
    /// Absorbing next states contribute no bootstrapped value.
    pub fn backup(&mut self, transition: &TransitionInformation, discount_rate: f64) {
        let target = if transition.is_terminal {
            transition.reward
        } else {
            transition.reward + discount_rate * self.max_value(transition.new_state_id)
        };
        self.update_value(transition.previous_state_id, transition.previous_action, target);
    }

    /// Ids of the states with at least one seeded entry.
    pub fn known_states(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Learning rate.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}
