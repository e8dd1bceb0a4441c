use gridrl_core::{DynamicsOption, HyperParameter, SearchTarget};
use std::collections::BTreeMap;

/// Best result found so far for one [`SearchTarget`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchArea {
    target: SearchTarget,
    best_reward: f64,
    best_parameters: BTreeMap<HyperParameter, f64>,
    attempts: usize,
}

impl SearchArea {
    /// An area with no attempts.
    pub fn new(target: SearchTarget) -> Self {
        Self {
            target,
            best_reward: f64::NEG_INFINITY,
            best_parameters: BTreeMap::new(),
            attempts: 0,
        }
    }

    /// Returns the area after one more attempt.
    ///
    /// The best pair is replaced only by a strictly better reward.
    pub fn with_result(&self, reward: f64, parameters: &BTreeMap<HyperParameter, f64>) -> Self {
        let mut next = self.clone();
        next.attempts += 1;
        if reward > self.best_reward {
            next.best_reward = reward;
            next.best_parameters = parameters.clone();
        }
        next
    }

    /// The target.
    pub fn target(&self) -> &SearchTarget {
        &self.target
    }

    /// Best mean reward, `-inf` before the first attempt.
    pub fn best_reward(&self) -> f64 {
        self.best_reward
    }

    /// Hyperparameters of the best reward.
    pub fn best_parameters(&self) -> &BTreeMap<HyperParameter, f64> {
        &self.best_parameters
    }

    /// Number of completed evaluations.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

/// Snapshot of a [`RandomSearch`](crate::RandomSearch).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RandomSearchState {
    areas: BTreeMap<SearchTarget, SearchArea>,
    optimal_rewards: BTreeMap<DynamicsOption, f64>,
}

impl RandomSearchState {
    /// A state with an empty area per target.
    pub fn new(targets: &[SearchTarget]) -> Self {
        Self {
            areas: targets.iter().map(|&t| (t, SearchArea::new(t))).collect(),
            optimal_rewards: BTreeMap::new(),
        }
    }

    /// Returns the state with one more result for `target`.
    pub fn with_result(
        &self,
        target: SearchTarget,
        reward: f64,
        parameters: &BTreeMap<HyperParameter, f64>,
    ) -> Self {
        let mut next = self.clone();
        let area = self
            .areas
            .get(&target)
            .cloned()
            .unwrap_or_else(|| SearchArea::new(target));
        next.areas.insert(target, area.with_result(reward, parameters));
        next
    }

    /// Returns the state with the optimal reward of `dynamics`.
    pub fn with_optimal_reward(&self, dynamics: DynamicsOption, reward: f64) -> Self {
        let mut next = self.clone();
        next.optimal_rewards.insert(dynamics, reward);
        next
    }

    /// Area of `target`.
    pub fn area(&self, target: &SearchTarget) -> Option<&SearchArea> {
        self.areas.get(target)
    }

    /// Every area, ordered by target.
    pub fn areas(&self) -> impl Iterator<Item = &SearchArea> {
        self.areas.values()
    }

    /// Reward of the optimal policy on `dynamics`, once known.
    pub fn optimal_reward(&self, dynamics: DynamicsOption) -> Option<f64> {
        self.optimal_rewards.get(&dynamics).copied()
    }

    /// Completed evaluations over every target.
    pub fn total_attempts(&self) -> usize {
        self.areas.values().map(SearchArea::attempts).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridrl_core::ExplorationOption;

    fn target() -> SearchTarget {
        SearchTarget::q_learning(DynamicsOption::Cliff, ExplorationOption::EpsilonGreedy)
    }

    #[test]
    fn best_only_improves_but_attempts_always_count() {
        let good = BTreeMap::from([(HyperParameter::LearningRate, 0.5)]);
        let bad = BTreeMap::from([(HyperParameter::LearningRate, 0.01)]);

        let s0 = RandomSearchState::new(&[target()]);
        let s1 = s0.with_result(target(), 3.0, &good);
        let s2 = s1.with_result(target(), -7.0, &bad);

        let area = s2.area(&target()).unwrap();
        assert_eq!(area.attempts(), 2);
        assert_eq!(area.best_reward(), 3.0);
        assert_eq!(area.best_parameters(), &good);

        // Earlier snapshots are untouched.
        assert_eq!(s0.area(&target()).unwrap().attempts(), 0);
        assert_eq!(s1.total_attempts(), 1);
    }

    #[test]
    fn optimal_rewards_are_per_dynamics() {
        let s = RandomSearchState::default().with_optimal_reward(DynamicsOption::Wind, 12.0);
        assert_eq!(s.optimal_reward(DynamicsOption::Wind), Some(12.0));
        assert_eq!(s.optimal_reward(DynamicsOption::Cliff), None);
        assert_eq!(s.areas().count(), 0);
    }
}
