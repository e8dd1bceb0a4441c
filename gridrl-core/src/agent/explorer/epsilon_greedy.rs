use crate::{agent::DynamicQTable, Action, TransitionInformation};

/// Floor of the exploration ratio.
pub const MIN_EXPLORATION_RATIO: f64 = 1e3 * f64::EPSILON;

/// Epsilon-greedy explorer.
///
/// Picks a uniformly random action with probability `exploration_ratio`,
/// otherwise the first action with the largest value. The ratio decays
/// geometrically after every transition and never drops below
/// [`MIN_EXPLORATION_RATIO`].
pub struct EpsilonGreedy {
    exploration_ratio: f64,
    decay: f64,
    rng: fastrand::Rng,
}

impl EpsilonGreedy {
    /// Constructs the explorer.
    pub fn new(exploration_ratio: f64, decay: f64, seed: u64) -> Self {
        Self {
            exploration_ratio: exploration_ratio.max(MIN_EXPLORATION_RATIO),
            decay: decay.clamp(0.0, 1.0),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Current exploration ratio.
    pub fn exploration_ratio(&self) -> f64 {
        self.exploration_ratio
    }

    pub(super) fn select_action(&mut self, table: &mut DynamicQTable, state_id: usize) -> Action {
        if self.rng.f64() < self.exploration_ratio {
            Action::random(&mut self.rng)
        } else {
            table.best_action(state_id)
        }
    }

    pub(super) fn record_transition(
        &mut self,
        table: &mut DynamicQTable,
        transition: &TransitionInformation,
        discount_rate: f64,
    ) {
        table.backup(transition, discount_rate);
        self.exploration_ratio = (self.exploration_ratio * self.decay).max(MIN_EXPLORATION_RATIO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QTableInitialisation;

    #[test]
    fn ratio_decays_to_the_floor() {
        let mut table = DynamicQTable::new(QTableInitialisation::Optimistic, 0.0, 0.1, 0);
        let mut explorer = EpsilonGreedy::new(0.5, 0.5, 0);
        let t = TransitionInformation::new(0, Action::Up, 1, 0.0);
        let mut previous = explorer.exploration_ratio();
        for _ in 0..200 {
            explorer.record_transition(&mut table, &t, 0.9);
            let ratio = explorer.exploration_ratio();
            assert!(ratio <= previous);
            assert!(ratio >= MIN_EXPLORATION_RATIO);
            previous = ratio;
        }
        assert_eq!(previous, MIN_EXPLORATION_RATIO);
    }

    #[test]
    fn greedy_without_exploration() {
        let mut table = DynamicQTable::new(QTableInitialisation::Optimistic, 0.0, 1.0, 0);
        table.update_value(0, Action::Down, 1.0);
        let mut explorer = EpsilonGreedy::new(0.0, 1.0, 0);
        for _ in 0..100 {
            assert_eq!(explorer.select_action(&mut table, 0), Action::Down);
        }
    }

    #[test]
    fn full_exploration_visits_every_action() {
        let mut table = DynamicQTable::new(QTableInitialisation::Optimistic, 0.0, 1.0, 0);
        let mut explorer = EpsilonGreedy::new(1.0, 1.0, 9);
        let mut seen = [false; Action::COUNT];
        for _ in 0..200 {
            seen[explorer.select_action(&mut table, 0).index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
