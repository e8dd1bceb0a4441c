use crate::{agent::DynamicQTable, Action, TransitionInformation};
use std::collections::HashMap;
use xxhash_rust::xxh3::Xxh3Builder;

/// Upper-confidence-bound explorer.
///
/// Scores each action as `Q(s, a) + c * sqrt(ln(t) / (n(s, a) + eps))` and
/// picks the best one, starting the scan from a random default action so that
/// ties do not always favour the same action.
pub struct UpperConfidenceBound {
    exploration_bias: f64,
    step: u64,
    visits: HashMap<usize, [u64; Action::COUNT], Xxh3Builder>,
    rng: fastrand::Rng,
}

impl UpperConfidenceBound {
    /// Constructs the explorer.
    pub fn new(exploration_bias: f64, seed: u64) -> Self {
        Self {
            exploration_bias,
            step: 0,
            visits: HashMap::default(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Number of recorded transitions.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Number of times `action` was recorded in `state_id`.
    pub fn visits(&self, state_id: usize, action: Action) -> u64 {
        self.visits
            .get(&state_id)
            .map_or(0, |counts| counts[action.index()])
    }

    fn score(&self, values: &[f64; Action::COUNT], state_id: usize, action: Action) -> f64 {
        let t = self.step.max(1) as f64;
        let n = self.visits(state_id, action) as f64;
        values[action.index()] + self.exploration_bias * (t.ln() / (n + f64::EPSILON)).sqrt()
    }

    pub(super) fn select_action(&mut self, table: &mut DynamicQTable, state_id: usize) -> Action {
        let values = table.action_values(state_id);
        let mut best = Action::random(&mut self.rng);
        let mut best_score = self.score(&values, state_id, best);
        for a in Action::ALL {
            let score = self.score(&values, state_id, a);
            if score > best_score {
                best = a;
                best_score = score;
            }
        }
        best
    }

    pub(super) fn record_transition(
        &mut self,
        table: &mut DynamicQTable,
        transition: &TransitionInformation,
        discount_rate: f64,
    ) {
        self.step += 1;
        self.visits.entry(transition.previous_state_id).or_default()
            [transition.previous_action.index()] += 1;
        table.backup(transition, discount_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QTableInitialisation;

    #[test]
    fn unvisited_actions_are_tried() {
        let mut table = DynamicQTable::new(QTableInitialisation::Optimistic, 0.0, 0.5, 0);
        let mut explorer = UpperConfidenceBound::new(1.0, 4);
        let mut seen = [false; Action::COUNT];
        for _ in 0..Action::COUNT + 1 {
            let a = explorer.select_action(&mut table, 0);
            seen[a.index()] = true;
            explorer.record_transition(&mut table, &TransitionInformation::new(0, a, 0, 0.0), 0.9);
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(explorer.step(), Action::COUNT as u64 + 1);
    }

    #[test]
    fn no_bias_is_greedy() {
        let mut table = DynamicQTable::new(QTableInitialisation::Optimistic, 0.0, 1.0, 0);
        table.update_value(3, Action::Left, 2.0);
        let mut explorer = UpperConfidenceBound::new(0.0, 1);
        for _ in 0..20 {
            assert_eq!(explorer.select_action(&mut table, 3), Action::Left);
        }
    }

    #[test]
    fn ties_go_to_a_random_default() {
        // Before the first transition every score is the initial value.
        let mut table = DynamicQTable::new(QTableInitialisation::Optimistic, 0.0, 1.0, 0);
        let mut explorer = UpperConfidenceBound::new(1.0, 2);
        let mut seen = [false; Action::COUNT];
        for _ in 0..50 {
            seen[explorer.select_action(&mut table, 0).index()] = true;
        }
        assert!(seen.iter().filter(|&&s| s).count() > 1);
    }

    #[test]
    fn visits_are_counted_per_state_action() {
        let mut table = DynamicQTable::new(QTableInitialisation::Optimistic, 0.0, 1.0, 0);
        let mut explorer = UpperConfidenceBound::new(1.0, 0);
        let t = TransitionInformation::new(2, Action::Right, 3, 0.0);
        explorer.record_transition(&mut table, &t, 0.9);
        explorer.record_transition(&mut table, &t, 0.9);
        assert_eq!(explorer.visits(2, Action::Right), 2);
        assert_eq!(explorer.visits(2, Action::Left), 0);
    }
}
