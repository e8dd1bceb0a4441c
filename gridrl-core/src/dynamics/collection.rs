use super::Grid;
use crate::{
    Action, CellEntity, Dynamics, GridConfig, RewardConfig, StateChange, StateInstance, StatePool,
};
use anyhow::Result;

/// Collect every goal scattered over the grid.
///
/// Reaching a goal pays the goal reward and removes it. Entering a hazard pays
/// the hazard penalty. The world is absorbing once every goal is collected, a
/// hazard is entered or the agent runs out of energy.
pub struct CollectionDynamics {
    grid: Grid,
    initial_state: StateInstance,
    rewards: RewardConfig,
    energy_limited: bool,
    goal_count: usize,
    pool: StatePool,
}

impl CollectionDynamics {
    /// Builds the world, scattering goals and hazards with the layout seed.
    pub fn build(config: &GridConfig) -> Result<Self> {
        let grid = Grid::from_config(config)?;
        let start = config.initial_agent_location;
        let mut cells: Vec<_> = grid.cells().filter(|&c| c != start).collect();
        fastrand::Rng::with_seed(config.layout_seed).shuffle(&mut cells);

        let goal_count = config.goal_count.min(cells.len());
        let hazard_count = config.hazard_count.min(cells.len() - goal_count);
        let entities = cells
            .iter()
            .take(goal_count)
            .map(|&c| (c, CellEntity::Goal))
            .chain(
                cells
                    .iter()
                    .skip(goal_count)
                    .take(hazard_count)
                    .map(|&c| (c, CellEntity::Hazard)),
            );
        let initial_state = StateInstance::new(start, entities, config.agent_energy.unwrap_or(0));

        Ok(Self {
            grid,
            initial_state,
            rewards: config.rewards.clone(),
            energy_limited: config.agent_energy.is_some(),
            goal_count,
            pool: StatePool::new(),
        })
    }
}

impl Dynamics for CollectionDynamics {
    fn is_stochastic(&self) -> bool {
        false
    }

    fn initial_state(&self) -> StateInstance {
        self.initial_state.clone()
    }

    fn next(&mut self, state: &StateInstance, action: Action) -> (StateInstance, f64) {
        if self.is_terminal(state) {
            return (state.clone(), 0.0);
        }

        let loc = self.grid.step(state.agent_location(), action);
        let mut changes = vec![StateChange::AgentLocation(loc)];
        if self.energy_limited {
            changes.push(StateChange::AgentEnergy(state.agent_energy() - 1));
        }

        let mut reward = self.rewards.step;
        match state.entity_at(loc) {
            CellEntity::Goal => {
                reward += self.rewards.goal;
                changes.push(StateChange::ClearEntity(loc));
            }
            CellEntity::Hazard => reward += self.rewards.hazard,
            _ => {}
        }
        (state.with_changes(&changes), reward)
    }

    fn is_terminal(&self, state: &StateInstance) -> bool {
        state.count(CellEntity::Goal) == 0
            || state.entity_at(state.agent_location()) == CellEntity::Hazard
            || (self.energy_limited && state.agent_energy() <= 0)
    }

    fn state_count_upper_bound(&self) -> Option<usize> {
        let energy_levels = if self.energy_limited {
            self.initial_state.agent_energy().max(0) as usize + 1
        } else {
            1
        };
        let goal_subsets = 1usize.checked_shl(self.goal_count as u32)?;
        self.grid
            .cell_count()
            .checked_mul(goal_subsets)?
            .checked_mul(energy_levels)
    }

    fn state_pool(&self) -> &StatePool {
        &self.pool
    }

    fn state_pool_mut(&mut self) -> &mut StatePool {
        &mut self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GridConfig {
        GridConfig::default()
            .size(3, 1)
            .initial_agent_location((0, 0))
            .goal_count(2)
            .hazard_count(0)
    }

    #[test]
    fn collecting_every_goal_is_absorbing() {
        let mut dynamics = CollectionDynamics::build(&config()).unwrap();
        let s0 = dynamics.initial_state();
        assert_eq!(s0.count(CellEntity::Goal), 2);

        let (s1, r1) = dynamics.next(&s0, Action::Right);
        assert_eq!(r1, -1.0 + 10.0);
        let (s2, r2) = dynamics.next(&s1, Action::Right);
        assert_eq!(r2, -1.0 + 10.0);
        assert!(dynamics.is_terminal(&s2));

        let (s3, r3) = dynamics.next(&s2, Action::Left);
        assert_eq!(s3, s2);
        assert_eq!(r3, 0.0);
    }

    #[test]
    fn energy_runs_out() {
        let mut dynamics =
            CollectionDynamics::build(&config().size(4, 1).goal_count(1).agent_energy(Some(1)))
                .unwrap();
        let s0 = dynamics.initial_state();
        let (s1, _) = dynamics.next(&s0, Action::Left);
        assert_eq!(s1.agent_energy(), 0);
        assert!(dynamics.is_terminal(&s1));
        assert_eq!(dynamics.state_count_upper_bound(), Some(4 * 2 * 2));
    }

    #[test]
    fn layout_is_reproducible() {
        let a = CollectionDynamics::build(&GridConfig::default()).unwrap();
        let b = CollectionDynamics::build(&GridConfig::default()).unwrap();
        assert_eq!(a.initial_state(), b.initial_state());
        assert_eq!(a.initial_state().count(CellEntity::Hazard), 1);
    }

    #[test]
    fn ids_go_through_the_pool() {
        let mut dynamics = CollectionDynamics::build(&config()).unwrap();
        let s0 = dynamics.initial_state_id();
        assert_eq!(s0, 0);
        let (s1, _) = dynamics.next_state_id(s0, Action::Right).unwrap();
        assert_eq!(s1, 1);
        let (again, _) = dynamics.next_state_id(s0, Action::Right).unwrap();
        assert_eq!(again, 1);
        assert!(dynamics.next_state_id(7, Action::Up).is_err());
    }
}
