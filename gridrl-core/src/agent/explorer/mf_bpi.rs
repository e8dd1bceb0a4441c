use crate::{agent::DynamicQTable, Action, ActionValues, TransitionInformation};
use std::collections::HashMap;
use xxhash_rust::xxh3::Xxh3Builder;

/// Quantile of the ensemble used as the optimistic estimate.
const QUANTILE: f64 = 0.9;

/// Probability that a member of the ensemble learns from a transition.
const UPDATE_PROBABILITY: f64 = 0.7;

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Smallest value gap, keeps allocations finite when estimates tie.
const MIN_GAP: f64 = 1e-6;

type Table = HashMap<usize, ActionValues, Xxh3Builder>;

/// Model-free best policy identification explorer.
///
/// An ensemble of Q-tables and companion tables of the `2k`-th moment of the
/// scaled TD error estimate both the value gaps between actions and their
/// uncertainty. Actions are drawn from an allocation that spends more on
/// actions with small gaps and large uncertainty, mixed with forced uniform
/// exploration that decays with the number of visits of the state.
///
/// Members are seeded lazily from the main Q-table and each member learns from
/// a transition with a fixed probability, so the ensemble disagrees where data
/// is scarce.
pub struct MfBpi {
    ensemble_size: usize,
    moment_order: f64,
    exploration_parameter: f64,
    q: Vec<Table>,
    m: Vec<Table>,
    visits: HashMap<usize, [u64; Action::COUNT], Xxh3Builder>,
    rng: fastrand::Rng,
}

fn quantile(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let ix = ((values.len() - 1) as f64 * QUANTILE).round() as usize;
    values[ix]
}

impl MfBpi {
    /// Constructs the explorer.
    ///
    /// `moment_order` is the `k` of the error moments and is at least 1.
    pub fn new(ensemble_size: usize, moment_order: f64, exploration_parameter: f64, seed: u64) -> Self {
        let ensemble_size = ensemble_size.max(1);
        Self {
            ensemble_size,
            moment_order: moment_order.max(1.0),
            exploration_parameter,
            q: (0..ensemble_size).map(|_| Table::default()).collect(),
            m: (0..ensemble_size).map(|_| Table::default()).collect(),
            visits: HashMap::default(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Number of members of the ensemble.
    pub fn ensemble_size(&self) -> usize {
        self.ensemble_size
    }

    /// Number of recorded transitions leaving `state_id`.
    pub fn state_visits(&self, state_id: usize) -> u64 {
        self.visits.get(&state_id).map_or(0, |counts| counts.iter().sum())
    }

    /// Probability of a uniformly random action in `state_id`.
    pub fn forced_exploration_rate(&self, state_id: usize) -> f64 {
        let n = self.state_visits(state_id).max(1) as f64;
        (self.exploration_parameter / n.sqrt()).clamp(0.0, 1.0)
    }

    fn member_values(&mut self, member: usize, table: &mut DynamicQTable, state_id: usize) -> ActionValues {
        *self.q[member]
            .entry(state_id)
            .or_insert_with(|| table.action_values(state_id))
    }

    fn member_moments(&self, member: usize, state_id: usize) -> ActionValues {
        self.m[member]
            .get(&state_id)
            .copied()
            .unwrap_or([1.0; Action::COUNT])
    }

    /// Sampling probabilities of the actions of `state_id`, excluding forced exploration.
    pub fn allocation(&mut self, table: &mut DynamicQTable, state_id: usize) -> ActionValues {
        let values: Vec<_> = (0..self.ensemble_size)
            .map(|b| self.member_values(b, table, state_id))
            .collect();
        let moments: Vec<_> = (0..self.ensemble_size)
            .map(|b| self.member_moments(b, state_id))
            .collect();

        let mut q_hat = [0.0; Action::COUNT];
        let mut m_hat = [0.0; Action::COUNT];
        for a in Action::ALL {
            q_hat[a.index()] = quantile(values.iter().map(|v| v[a.index()]).collect());
            m_hat[a.index()] = quantile(moments.iter().map(|m| m[a.index()]).collect());
        }

        let mut best = 0;
        for ix in 1..Action::COUNT {
            if q_hat[ix] > q_hat[best] {
                best = ix;
            }
        }

        let phi_sq = GOLDEN_RATIO * GOLDEN_RATIO;
        let mut h = [0.0; Action::COUNT];
        for ix in (0..Action::COUNT).filter(|&ix| ix != best) {
            let gap = (q_hat[best] - q_hat[ix]).max(MIN_GAP);
            h[ix] = (2.0 + 8.0 * phi_sq * m_hat[ix].powf(1.0 / self.moment_order)) / (gap * gap);
        }
        h[best] = (2.0 * h.iter().sum::<f64>()).sqrt();

        let total: f64 = h.iter().sum();
        if total.is_finite() && total > 0.0 {
            h.map(|x| x / total)
        } else {
            [1.0 / Action::COUNT as f64; Action::COUNT]
        }
    }

    pub(super) fn select_action(&mut self, table: &mut DynamicQTable, state_id: usize) -> Action {
        if self.rng.f64() < self.forced_exploration_rate(state_id) {
            return Action::random(&mut self.rng);
        }
        let omega = self.allocation(table, state_id);
        let r = self.rng.f64();
        let mut cumulative = 0.0;
        for a in Action::ALL {
            cumulative += omega[a.index()];
            if r < cumulative {
                return a;
            }
        }
        Action::ALL[Action::COUNT - 1]
    }

    pub(super) fn record_transition(
        &mut self,
        table: &mut DynamicQTable,
        transition: &TransitionInformation,
        discount_rate: f64,
    ) {
        table.backup(transition, discount_rate);

        let s = transition.previous_state_id;
        let a = transition.previous_action.index();
        let counts = self.visits.entry(s).or_default();
        counts[a] += 1;
        let rate = 1.0 / (1.0 + counts[a] as f64).sqrt();

        for b in 0..self.ensemble_size {
            if self.rng.f64() >= UPDATE_PROBABILITY {
                continue;
            }
            let q_sa = self.member_values(b, table, s)[a];
            let next_value = if transition.is_terminal {
                0.0
            } else {
                self.member_values(b, table, transition.new_state_id)
                    .iter()
                    .copied()
                    .fold(f64::NEG_INFINITY, f64::max)
            };
            let td = transition.reward + discount_rate * next_value - q_sa;
            if let Some(values) = self.q[b].get_mut(&s) {
                values[a] = q_sa + rate * td;
            }

            let scaled = if discount_rate > 0.0 { td / discount_rate } else { td };
            let moments = self.m[b].entry(s).or_insert([1.0; Action::COUNT]);
            moments[a] = (1.0 - rate) * moments[a] + rate * scaled.abs().powf(2.0 * self.moment_order);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QTableInitialisation;

    fn table() -> DynamicQTable {
        DynamicQTable::new(QTableInitialisation::Optimistic, 0.0, 0.5, 0)
    }

    #[test]
    fn allocation_is_a_distribution() {
        let mut table = table();
        table.update_value(0, Action::Right, 4.0);
        let mut explorer = MfBpi::new(5, 2.0, 1.0, 3);
        let omega = explorer.allocation(&mut table, 0);
        let total: f64 = omega.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(omega.iter().all(|&p| p >= 0.0));

        // Suboptimal actions with equal gaps share the same weight.
        assert!((omega[0] - omega[1]).abs() < 1e-12);
        assert!((omega[1] - omega[2]).abs() < 1e-12);
    }

    #[test]
    fn forced_exploration_decays_with_visits() {
        let mut table = table();
        let mut explorer = MfBpi::new(3, 1.0, 1.0, 0);
        assert_eq!(explorer.forced_exploration_rate(0), 1.0);
        let t = TransitionInformation::new(0, Action::Up, 1, -1.0);
        for _ in 0..16 {
            explorer.record_transition(&mut table, &t, 0.9);
        }
        assert_eq!(explorer.state_visits(0), 16);
        assert!((explorer.forced_exploration_rate(0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn selected_actions_are_valid_and_seeded() {
        let mut table = table();
        let mut explorer = MfBpi::new(4, 2.0, 0.5, 7);
        for step in 0..50 {
            let a = explorer.select_action(&mut table, step % 3);
            let t = TransitionInformation::new(step % 3, a, (step + 1) % 3, 1.0);
            explorer.record_transition(&mut table, &t, 0.9);
        }
        assert_eq!(explorer.ensemble_size(), 4);
        for b in 0..4 {
            assert!(explorer.q[b].contains_key(&0));
        }
    }
}
