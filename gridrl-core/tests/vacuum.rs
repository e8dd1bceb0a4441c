//! Value iteration on a two-cell vacuum world with known optimal values.
use anyhow::Result;
use gridrl_core::{
    Action, Agent, AgentConfig, CellEntity, ConfigHyperParameters, Dynamics, DynamicsDistribution,
    HyperParameter, SharedDynamics, SolverBackend, StateChange, StateInstance, StatePool,
    ValueIterationAgent,
};
use std::{cell::RefCell, rc::Rc};
use test_log::test;

const DIRT: CellEntity = CellEntity::Goal;
const LEFT: (i32, i32) = (0, 0);
const RIGHT: (i32, i32) = (1, 0);

/// Left and right move, up cleans the current cell, down does nothing.
///
/// Cleaning a dirty cell pays 1. Once both cells are clean the agent location
/// no longer matters, so all clean states collapse into one absorbing state.
#[derive(Default)]
struct Vacuum {
    pool: StatePool,
}

fn state(agent: (i32, i32), dirty: &[(i32, i32)]) -> StateInstance {
    StateInstance::new(agent, dirty.iter().map(|&c| (c, DIRT)), 0)
}

impl Dynamics for Vacuum {
    fn is_stochastic(&self) -> bool {
        false
    }

    fn initial_state(&self) -> StateInstance {
        state(LEFT, &[LEFT, RIGHT])
    }

    fn next(&mut self, state: &StateInstance, action: Action) -> (StateInstance, f64) {
        if self.is_terminal(state) {
            return (state.clone(), 0.0);
        }
        let here = state.agent_location();
        let (next, reward) = match action {
            Action::Left => (state.with_changes(&[StateChange::AgentLocation(LEFT)]), 0.0),
            Action::Right => (state.with_changes(&[StateChange::AgentLocation(RIGHT)]), 0.0),
            Action::Up if state.entity_at(here) == DIRT => {
                (state.with_changes(&[StateChange::ClearEntity(here)]), 1.0)
            }
            _ => (state.clone(), 0.0),
        };
        if next.count(DIRT) == 0 {
            (StateInstance::new(LEFT, std::iter::empty(), 0), reward)
        } else {
            (next, reward)
        }
    }

    fn is_terminal(&self, state: &StateInstance) -> bool {
        state.count(DIRT) == 0
    }

    fn state_pool(&self) -> &StatePool {
        &self.pool
    }

    fn state_pool_mut(&mut self) -> &mut StatePool {
        &mut self.pool
    }
}

fn solved(backend: SolverBackend) -> Result<(SharedDynamics, ValueIterationAgent)> {
    let dynamics: SharedDynamics = Rc::new(RefCell::new(Vacuum::default()));
    let config = AgentConfig::default()
        .stopping_epsilon(1e-10)
        .solver_backend(backend)
        .hyper_parameter(HyperParameter::DiscountRate, 0.9);
    let mut hp = ConfigHyperParameters::from_config(&config);
    let mut agent = ValueIterationAgent::build(dynamics.clone(), &mut hp, &config, 42)?;
    agent.get_value_table()?;
    Ok((dynamics, agent))
}

fn id_of(dynamics: &SharedDynamics, s: &StateInstance) -> usize {
    dynamics.borrow().state_pool().find_state_id(s).unwrap()
}

#[test]
fn seven_states_are_compiled() -> Result<()> {
    let mut dynamics = Vacuum::default();
    let mut distribution = DynamicsDistribution::new(10);
    distribution.compile(&mut dynamics)?;
    assert_eq!(distribution.state_count()?, 7);
    assert_eq!(dynamics.state_pool().len(), 7);
    Ok(())
}

#[test]
fn optimal_values_match_the_closed_form() -> Result<()> {
    for backend in [SolverBackend::Dictionary, SolverBackend::Flattened] {
        let (dynamics, mut agent) = solved(backend)?;
        let tol = 1e-8;

        let absorbing = id_of(&dynamics, &state(LEFT, &[]));
        assert!(agent.get_state_value(absorbing)?.abs() < tol);

        for (agent_at, dirty) in [(LEFT, LEFT), (RIGHT, RIGHT)] {
            let on_last = id_of(&dynamics, &state(agent_at, &[dirty]));
            assert!((agent.get_state_value(on_last)? - 1.0).abs() < tol);
            assert_eq!(agent.evaluate_policy(on_last)?, Action::Up);
        }

        for (agent_at, dirty, towards) in [(LEFT, RIGHT, Action::Right), (RIGHT, LEFT, Action::Left)] {
            let beside = id_of(&dynamics, &state(agent_at, &[dirty]));
            assert!((agent.get_state_value(beside)? - 0.9).abs() < tol);
            assert_eq!(agent.evaluate_policy(beside)?, towards);
        }

        let start = id_of(&dynamics, &state(LEFT, &[LEFT, RIGHT]));
        assert!((agent.get_state_value(start)? - 1.81).abs() < tol);
        assert!((agent.get_state_action_value(start, Action::Right)? - 0.9 * 1.81).abs() < tol);
        assert_eq!(agent.evaluate_policy(start)?, Action::Up);
    }
    Ok(())
}

#[test]
fn bellman_residual_is_within_the_stopping_epsilon() -> Result<()> {
    let (_, mut agent) = solved(SolverBackend::Dictionary)?;
    let table = agent.get_value_table()?;
    assert_eq!(table.iter().count(), 7);
    for (s, v) in table.iter() {
        let best = Action::ALL
            .iter()
            .map(|&a| agent.get_state_action_value(s, a))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((v - best).abs() <= 1e-10);
    }
    Ok(())
}
