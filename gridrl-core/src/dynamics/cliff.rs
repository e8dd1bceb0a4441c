use super::Grid;
use crate::{
    Action, CellEntity, Dynamics, GridConfig, Location, RewardConfig, StateChange, StateInstance,
    StatePool,
};
use anyhow::Result;

/// Walk along the bottom row without falling off the cliff.
///
/// The bottom row between the two corners is a hazard and the bottom-right
/// corner is the goal. Entering either ends the episode.
pub struct CliffDynamics {
    grid: Grid,
    initial_state: StateInstance,
    rewards: RewardConfig,
    pool: StatePool,
}

impl CliffDynamics {
    /// Builds the world.
    pub fn build(config: &GridConfig) -> Result<Self> {
        let grid = Grid::from_config(config)?;
        let bottom = grid.height() - 1;
        let goal: Location = (grid.width() - 1, bottom);
        let entities = (1..grid.width() - 1)
            .map(|x| ((x, bottom), CellEntity::Hazard))
            .chain(std::iter::once((goal, CellEntity::Goal)))
            .filter(|&(c, _)| c != config.initial_agent_location);

        Ok(Self {
            grid,
            initial_state: StateInstance::new(config.initial_agent_location, entities, 0),
            rewards: config.rewards.clone(),
            pool: StatePool::new(),
        })
    }
}

/// Moves the agent to `loc` and pays for whatever is there.
pub(super) fn enter(state: &StateInstance, loc: Location, rewards: &RewardConfig) -> (StateInstance, f64) {
    let reward = rewards.step
        + match state.entity_at(loc) {
            CellEntity::Goal => rewards.goal,
            CellEntity::Hazard => rewards.hazard,
            _ => 0.0,
        };
    (state.with_changes(&[StateChange::AgentLocation(loc)]), reward)
}

/// Agent standing on a goal or hazard.
pub(super) fn on_terminal_cell(state: &StateInstance) -> bool {
    matches!(
        state.entity_at(state.agent_location()),
        CellEntity::Goal | CellEntity::Hazard
    )
}

impl Dynamics for CliffDynamics {
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
        enter(state, loc, &self.rewards)
    }

    fn is_terminal(&self, state: &StateInstance) -> bool {
        on_terminal_cell(state)
    }

    fn state_count_upper_bound(&self) -> Option<usize> {
        Some(self.grid.cell_count())
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

    #[test]
    fn falling_off_the_cliff_is_terminal() {
        let mut dynamics = CliffDynamics::build(&GridConfig::default()).unwrap();
        let s0 = dynamics.initial_state();
        assert_eq!(s0.agent_location(), (0, 3));
        let (s1, r) = dynamics.next(&s0, Action::Right);
        assert_eq!(r, -101.0);
        assert!(dynamics.is_terminal(&s1));
        assert_eq!(dynamics.next(&s1, Action::Up), (s1.clone(), 0.0));
    }

    #[test]
    fn the_goal_is_in_the_far_corner() {
        let mut dynamics = CliffDynamics::build(&GridConfig::default()).unwrap();
        let mut s = dynamics.initial_state();
        let mut total = 0.0;
        let mut path = vec![Action::Up];
        path.extend([Action::Right; 4]);
        path.push(Action::Down);
        for a in path {
            let (next, r) = dynamics.next(&s, a);
            total += r;
            s = next;
        }
        assert!(dynamics.is_terminal(&s));
        assert_eq!(s.agent_location(), (4, 3));
        assert_eq!(total, -6.0 + 10.0);
    }

    #[test]
    fn out_of_bounds_start_is_rejected() {
        let config = GridConfig::default().initial_agent_location((-1, 0));
        assert!(CliffDynamics::build(&config).is_err());
    }
}
