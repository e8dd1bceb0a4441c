use crate::{
    dynamics::{ActionDistributions, FlatDistribution},
    error::GridRlError,
    Action, ActionValues, Agent, AgentConfig, DistributionResult, DynamicsDistribution, HyperParameter,
    HyperParameterStrategy, SharedDynamics, SolverBackend, TransitionInformation, ValueTable,
};
use anyhow::Result;
use log::{debug, info};
use std::collections::BTreeMap;

/// Expected return of one state-action pair under `values`.
fn expected_return(outcomes: &DistributionResult, values: &[f64], discount_rate: f64) -> f64 {
    outcomes
        .iter()
        .map(|(&next, &(reward, frequency))| frequency * (reward + discount_rate * values[next]))
        .sum()
}

/// One in-place sweep over the map form, returning the largest change.
fn sweep_dictionary(
    observations: &BTreeMap<usize, ActionDistributions>,
    values: &mut [f64],
    discount_rate: f64,
) -> f64 {
    let mut delta: f64 = 0.0;
    for (&s, per_action) in observations {
        let mut best = f64::NEG_INFINITY;
        for outcomes in per_action.iter() {
            let q = expected_return(outcomes, values, discount_rate);
            if q > best {
                best = q;
            }
        }
        delta = delta.max((values[s] - best).abs());
        values[s] = best;
    }
    delta
}

/// One in-place sweep over the array form, returning the largest change.
fn sweep_flattened(flat: &FlatDistribution, values: &mut [f64], discount_rate: f64) -> f64 {
    let mut delta: f64 = 0.0;
    for (ix, &s) in flat.states.iter().enumerate() {
        let mut best = f64::NEG_INFINITY;
        for range in flat.lookup[ix].iter() {
            let q: f64 = range
                .clone()
                .map(|k| {
                    flat.frequencies[k] * (flat.rewards[k] + discount_rate * values[flat.next_states[k]])
                })
                .sum();
            if q > best {
                best = q;
            }
        }
        delta = delta.max((values[s] - best).abs());
        values[s] = best;
    }
    delta
}

/// Offline solver over the compiled transition distribution.
///
/// The distribution is compiled on first use. Every call to
/// [`Agent::get_value_table`] solves again from a random initial guess with
/// Gauss-Seidel sweeps until the largest change of a sweep is at most the
/// stopping epsilon. Other queries reuse the last solution.
pub struct ValueIterationAgent {
    dynamics: SharedDynamics,
    distribution: DynamicsDistribution,
    discount_rate: f64,
    stopping_epsilon: f64,
    backend: SolverBackend,
    rng: fastrand::Rng,
    values: Option<Vec<f64>>,
    sweeps: usize,
}

impl ValueIterationAgent {
    /// Builds the agent, reading the discount rate from `hyper_parameters`.
    pub fn build(
        dynamics: SharedDynamics,
        hyper_parameters: &mut dyn HyperParameterStrategy,
        config: &AgentConfig,
        seed: u64,
    ) -> Result<Self> {
        Ok(Self {
            dynamics,
            distribution: DynamicsDistribution::new(config.distribution_sample_count),
            discount_rate: hyper_parameters.get_value(HyperParameter::DiscountRate)?,
            stopping_epsilon: config.stopping_epsilon,
            backend: config.solver_backend,
            rng: fastrand::Rng::with_seed(seed),
            values: None,
            sweeps: 0,
        })
    }

    /// The transition distribution, compiled or not.
    pub fn distribution(&self) -> &DynamicsDistribution {
        &self.distribution
    }

    /// Number of sweeps of the last solve.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Discount rate.
    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    fn compile(&mut self) -> Result<()> {
        if !self.distribution.has_compiled() {
            let mut dynamics = self.dynamics.borrow_mut();
            self.distribution.compile(&mut *dynamics)?;
        }
        Ok(())
    }

    fn solve(&mut self) -> Result<()> {
        self.compile()?;
        let observations = self.distribution.observations()?;
        let len = self.distribution.max_state_id()?.map_or(0, |s| s + 1);
        let mut values = vec![0.0; len];
        for &s in observations.keys() {
            values[s] = self.rng.f64();
        }

        let mut sweeps = 0;
        loop {
            let delta = match self.backend {
                SolverBackend::Dictionary => {
                    sweep_dictionary(observations, &mut values, self.discount_rate)
                }
                SolverBackend::Flattened => sweep_flattened(
                    self.distribution.flattened()?,
                    &mut values,
                    self.discount_rate,
                ),
            };
            sweeps += 1;
            debug!("Sweep {}: delta = {:e}", sweeps, delta);
            if delta <= self.stopping_epsilon {
                info!(
                    "Value iteration converged after {} sweeps over {} states (delta = {:e})",
                    sweeps,
                    observations.len(),
                    delta
                );
                break;
            }
        }

        self.sweeps = sweeps;
        self.values = Some(values);
        Ok(())
    }

    fn solved_values(&mut self) -> Result<&[f64]> {
        if self.values.is_none() {
            self.solve()?;
        }
        Ok(self.values.as_deref().ok_or(GridRlError::NotCompiled)?)
    }

    fn check_state_id(&mut self, state_id: usize) -> Result<()> {
        self.compile()?;
        if self.distribution.observations()?.contains_key(&state_id) {
            Ok(())
        } else {
            Err(GridRlError::InvalidStateId(state_id).into())
        }
    }

    fn action_values(&mut self, state_id: usize) -> Result<ActionValues> {
        self.check_state_id(state_id)?;
        self.solved_values()?;
        let values = self.values.as_deref().ok_or(GridRlError::NotCompiled)?;
        let per_action = self
            .distribution
            .observations()?
            .get(&state_id)
            .ok_or(GridRlError::InvalidStateId(state_id))?;
        let mut q = [0.0; Action::COUNT];
        for (ix, outcomes) in per_action.iter().enumerate() {
            q[ix] = expected_return(outcomes, values, self.discount_rate);
        }
        Ok(q)
    }
}

impl Agent for ValueIterationAgent {
    fn get_value_table(&mut self) -> Result<ValueTable> {
        self.solve()?;
        let values = self.values.as_deref().ok_or(GridRlError::NotCompiled)?;
        let observations = self.distribution.observations()?;
        Ok(ValueTable::new(
            values
                .iter()
                .enumerate()
                .map(|(s, &v)| observations.contains_key(&s).then_some(v))
                .collect(),
        ))
    }

    fn get_state_value(&mut self, state_id: usize) -> Result<f64> {
        self.check_state_id(state_id)?;
        Ok(self.solved_values()?[state_id])
    }

    fn get_state_action_value(&mut self, state_id: usize, action: Action) -> Result<f64> {
        Ok(self.action_values(state_id)?[action.index()])
    }

    fn evaluate_policy(&mut self, state_id: usize) -> Result<Action> {
        let q = self.action_values(state_id)?;
        let mut best = Action::random(&mut self.rng);
        for a in Action::ALL {
            if q[a.index()] > q[best.index()] {
                best = a;
            }
        }
        Ok(best)
    }

    fn record_transition(&mut self, _transition: &TransitionInformation) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CliffDynamics, ConfigHyperParameters, GridConfig, WindDynamics};
    use std::{cell::RefCell, rc::Rc};

    fn agent(dynamics: SharedDynamics, backend: SolverBackend) -> ValueIterationAgent {
        let config = AgentConfig::default()
            .solver_backend(backend)
            .stopping_epsilon(1e-8)
            .hyper_parameter(HyperParameter::DiscountRate, 0.9);
        let mut hp = ConfigHyperParameters::from_config(&config);
        ValueIterationAgent::build(dynamics, &mut hp, &config, 5).unwrap()
    }

    fn wind() -> SharedDynamics {
        Rc::new(RefCell::new(WindDynamics::build(&GridConfig::default(), 3).unwrap()))
    }

    #[test]
    fn backends_agree_exactly() {
        let dynamics = wind();
        let mut dictionary = agent(dynamics.clone(), SolverBackend::Dictionary);
        let mut flattened = agent(dynamics, SolverBackend::Flattened);

        // Share the compiled distribution so both solve the same sampled model.
        dictionary.compile().unwrap();
        flattened.distribution = dictionary.distribution.clone();

        let a = dictionary.get_value_table().unwrap();
        let b = flattened.get_value_table().unwrap();
        assert_eq!(a, b);
        assert_eq!(dictionary.sweeps(), flattened.sweeps());
    }

    #[test]
    fn solution_is_a_fixed_point() {
        let mut agent = agent(wind(), SolverBackend::Flattened);
        let table = agent.get_value_table().unwrap();
        assert!(!table.is_empty());
        for (s, v) in table.iter() {
            let best = Action::ALL
                .iter()
                .map(|&a| agent.get_state_action_value(s, a).unwrap())
                .fold(f64::NEG_INFINITY, f64::max);
            assert!((v - best).abs() <= 1e-8, "state {}: {} vs {}", s, v, best);
        }
    }

    #[test]
    fn policy_avoids_the_cliff() {
        let dynamics: SharedDynamics =
            Rc::new(RefCell::new(CliffDynamics::build(&GridConfig::default()).unwrap()));
        let mut agent = agent(dynamics.clone(), SolverBackend::Dictionary);
        let s0 = dynamics.borrow_mut().initial_state_id();
        for _ in 0..10 {
            assert_eq!(agent.evaluate_policy(s0).unwrap(), Action::Up);
        }
        let t = TransitionInformation::new(s0, Action::Up, s0, 0.0);
        let before = agent.get_state_value(s0).unwrap();
        agent.record_transition(&t).unwrap();
        assert_eq!(agent.get_state_value(s0).unwrap(), before);
    }

    #[test]
    fn sweep_deltas_never_increase() {
        let mut agent = agent(wind(), SolverBackend::Dictionary);
        agent.compile().unwrap();
        let observations = agent.distribution.observations().unwrap();
        let flat = agent.distribution.flattened().unwrap();
        let len = agent.distribution.max_state_id().unwrap().map_or(0, |s| s + 1);

        for seed in 0..3 {
            let rng = fastrand::Rng::with_seed(seed);
            let init: Vec<f64> = (0..len).map(|_| 10.0 * rng.f64()).collect();
            for flattened in [false, true] {
                let mut values = init.clone();
                let mut deltas = vec![];
                loop {
                    let delta = if flattened {
                        sweep_flattened(flat, &mut values, 0.9)
                    } else {
                        sweep_dictionary(observations, &mut values, 0.9)
                    };
                    deltas.push(delta);
                    if delta <= 1e-10 {
                        break;
                    }
                }
                assert!(deltas.len() > 1);
                for w in deltas.windows(2) {
                    assert!(w[1] <= w[0], "delta rose from {:e} to {:e}", w[0], w[1]);
                }
            }
        }
    }

    #[test]
    fn ties_go_to_a_random_default() {
        let dynamics: SharedDynamics =
            Rc::new(RefCell::new(CliffDynamics::build(&GridConfig::default()).unwrap()));
        let mut agent = agent(dynamics.clone(), SolverBackend::Flattened);
        let s0 = dynamics.borrow_mut().initial_state_id();
        // Stepping off the start enters the cliff, which loops on itself for every action.
        let (hazard, _) = dynamics.borrow_mut().next_state_id(s0, Action::Right).unwrap();
        assert!(dynamics.borrow().is_terminal_id(hazard).unwrap());

        let q = Action::ALL.map(|a| agent.get_state_action_value(hazard, a).unwrap());
        assert!(q.iter().all(|&v| v == q[0]));
        let mut seen = [false; Action::COUNT];
        for _ in 0..50 {
            seen[agent.evaluate_policy(hazard).unwrap().index()] = true;
        }
        assert!(seen.iter().filter(|&&s| s).count() > 1);
    }

    #[test]
    fn unknown_states_are_rejected() {
        let mut agent = agent(wind(), SolverBackend::Dictionary);
        let err = agent.get_state_value(10_000).unwrap_err();
        assert_eq!(
            err.downcast_ref::<GridRlError>(),
            Some(&GridRlError::InvalidStateId(10_000))
        );
    }
}
