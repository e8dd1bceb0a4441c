use crate::{error::GridRlError, Action, Dynamics};
use log::{debug, info};
use std::{
    collections::{BTreeMap, HashSet, VecDeque},
    ops::Range,
};

/// Outcomes of one state-action pair: `next_state_id -> (expected reward, frequency)`.
pub type DistributionResult = BTreeMap<usize, (f64, f64)>;

/// Outcomes of every action of one state, indexed by [`Action::index`].
pub type ActionDistributions = [DistributionResult; Action::COUNT];

/// Array-oriented encoding of a compiled distribution.
///
/// Outcomes of the `i`-th compiled state and action `a` live at
/// `lookup[i][a]` in the parallel arrays. States and outcomes are laid out in
/// the same order as the map form, so sums over either encoding perform the
/// same floating-point operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatDistribution {
    /// Compiled state ids in ascending order.
    pub states: Vec<usize>,

    /// Range of outcomes per compiled state and action.
    pub lookup: Vec<[Range<usize>; Action::COUNT]>,

    /// Next state of each outcome.
    pub next_states: Vec<usize>,

    /// Expected reward of each outcome.
    pub rewards: Vec<f64>,

    /// Frequency of each outcome.
    pub frequencies: Vec<f64>,
}

impl FlatDistribution {
    fn from_observations(observations: &BTreeMap<usize, ActionDistributions>) -> Self {
        let mut flat = Self::default();
        for (&s, per_action) in observations {
            flat.states.push(s);
            let mut ranges: [Range<usize>; Action::COUNT] = Default::default();
            for (ix, outcomes) in per_action.iter().enumerate() {
                let start = flat.next_states.len();
                for (&next, &(reward, frequency)) in outcomes {
                    flat.next_states.push(next);
                    flat.rewards.push(reward);
                    flat.frequencies.push(frequency);
                }
                ranges[ix] = start..flat.next_states.len();
            }
            flat.lookup.push(ranges);
        }
        flat
    }
}

/// Explicit transition distribution of the states reachable from the initial state.
///
/// Built by breadth-first exploration. Deterministic dynamics are sampled once
/// per state-action pair, stochastic ones `sample_count` times.
#[derive(Debug, Clone)]
pub struct DynamicsDistribution {
    sample_count: usize,
    observations: Option<BTreeMap<usize, ActionDistributions>>,
    flat: Option<FlatDistribution>,
}

impl DynamicsDistribution {
    /// Constructs an uncompiled distribution.
    pub fn new(sample_count: usize) -> Self {
        Self {
            sample_count: sample_count.max(1),
            observations: None,
            flat: None,
        }
    }

    /// Returns `true` once [`DynamicsDistribution::compile`] has run.
    pub fn has_compiled(&self) -> bool {
        self.observations.is_some()
    }

    /// Explores `dynamics` from its initial state.
    ///
    /// Compiling again discards the previous result.
    pub fn compile(&mut self, dynamics: &mut dyn Dynamics) -> Result<(), GridRlError> {
        let sample_count = if dynamics.is_stochastic() {
            self.sample_count
        } else {
            1
        };
        let capacity = dynamics.state_count_upper_bound().unwrap_or(0);
        let initial = dynamics.initial_state_id();
        let mut seen = HashSet::with_capacity(capacity);
        let mut frontier = VecDeque::from([initial]);
        let mut observations = BTreeMap::new();
        seen.insert(initial);

        while let Some(s) = frontier.pop_front() {
            let mut per_action: ActionDistributions = Default::default();
            for action in Action::ALL {
                let mut outcomes = BTreeMap::<usize, (f64, usize)>::new();
                for _ in 0..sample_count {
                    let (next, reward) = dynamics.next_state_id(s, action)?;
                    let entry = outcomes.entry(next).or_insert((0.0, 0));
                    entry.0 += reward;
                    entry.1 += 1;
                    if seen.insert(next) {
                        frontier.push_back(next);
                    }
                }
                per_action[action.index()] = outcomes
                    .into_iter()
                    .map(|(next, (sum, count))| {
                        (next, (sum / count as f64, count as f64 / sample_count as f64))
                    })
                    .collect();
            }
            observations.insert(s, per_action);
            debug!("Compiled state {}, {} states pending", s, frontier.len());
        }

        info!(
            "Compiled transition distribution of {} states with {} samples per action",
            observations.len(),
            sample_count
        );
        self.flat = Some(FlatDistribution::from_observations(&observations));
        self.observations = Some(observations);
        Ok(())
    }

    /// Outcomes of every compiled state.
    pub fn observations(&self) -> Result<&BTreeMap<usize, ActionDistributions>, GridRlError> {
        self.observations.as_ref().ok_or(GridRlError::NotCompiled)
    }

    /// Outcomes of one state-action pair.
    pub fn get(&self, state_id: usize, action: Action) -> Result<&DistributionResult, GridRlError> {
        self.observations()?
            .get(&state_id)
            .map(|per_action| &per_action[action.index()])
            .ok_or(GridRlError::InvalidStateId(state_id))
    }

    /// Array-oriented form of the same outcomes.
    pub fn flattened(&self) -> Result<&FlatDistribution, GridRlError> {
        self.flat.as_ref().ok_or(GridRlError::NotCompiled)
    }

    /// Number of compiled states.
    pub fn state_count(&self) -> Result<usize, GridRlError> {
        Ok(self.observations()?.len())
    }

    /// Largest compiled state id.
    pub fn max_state_id(&self) -> Result<Option<usize>, GridRlError> {
        Ok(self.observations()?.keys().next_back().copied())
    }
}
