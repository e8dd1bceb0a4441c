//! Reward statistics of a stepping loop.
use crate::{
    record::{Record, RecordValue},
    TransitionInformation,
};

/// Key of the accumulated reward in [`StatisticsRecorder::to_record`].
pub const TOTAL_REWARD: &str = "total_reward";

/// Key of the number of steps.
pub const STEPS: &str = "steps";

/// Key of the number of finished episodes.
pub const EPISODES: &str = "episodes";

/// Key of the returns of finished episodes.
pub const EPISODE_RETURNS: &str = "episode_returns";

/// Summary of the transitions seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Statistics {
    /// Sum of all rewards.
    pub total_reward: f64,

    /// Number of transitions.
    pub steps: usize,

    /// Number of episodes that reached an absorbing state.
    pub episodes: usize,

    /// Return of the episode in progress.
    pub current_return: f64,
}

/// Accumulates [`Statistics`] from transitions.
#[derive(Debug, Clone, Default)]
pub struct StatisticsRecorder {
    statistics: Statistics,
    episode_returns: Vec<f64>,
}

impl StatisticsRecorder {
    /// Constructs an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts for one transition.
    pub fn record_transition(&mut self, transition: &TransitionInformation) {
        let s = &mut self.statistics;
        s.total_reward += transition.reward;
        s.steps += 1;
        s.current_return += transition.reward;
        if transition.is_terminal {
            s.episodes += 1;
            self.episode_returns.push(s.current_return);
            s.current_return = 0.0;
        }
    }

    /// Drops the return of the episode in progress, keeping its reward in the total.
    pub fn abandon_episode(&mut self) {
        self.statistics.current_return = 0.0;
    }

    /// Current statistics.
    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    /// Returns of the finished episodes in order.
    pub fn episode_returns(&self) -> &[f64] {
        &self.episode_returns
    }

    /// Exports the statistics.
    pub fn to_record(&self) -> Record {
        let s = &self.statistics;
        Record::from_slice(&[
            (TOTAL_REWARD, RecordValue::Scalar(s.total_reward)),
            (STEPS, RecordValue::Scalar(s.steps as f64)),
            (EPISODES, RecordValue::Scalar(s.episodes as f64)),
            (EPISODE_RETURNS, RecordValue::Array1(self.episode_returns.clone())),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;

    #[test]
    fn episodes_are_split_on_absorbing_states() {
        let mut recorder = StatisticsRecorder::new();
        recorder.record_transition(&TransitionInformation::new(0, Action::Up, 1, -1.0));
        recorder.record_transition(&TransitionInformation::new(1, Action::Up, 2, 9.0).terminal(true));
        recorder.record_transition(&TransitionInformation::new(0, Action::Up, 1, -1.0));

        let s = recorder.statistics();
        assert_eq!(s.total_reward, 7.0);
        assert_eq!(s.steps, 3);
        assert_eq!(s.episodes, 1);
        assert_eq!(s.current_return, -1.0);
        assert_eq!(recorder.episode_returns(), &[8.0]);

        let record = recorder.to_record();
        assert_eq!(record.get_scalar(TOTAL_REWARD).unwrap(), 7.0);
        assert_eq!(record.get_array1(EPISODE_RETURNS).unwrap(), vec![8.0]);

        recorder.abandon_episode();
        assert_eq!(recorder.statistics().current_return, 0.0);
    }
}
