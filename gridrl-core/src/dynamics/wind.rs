use super::{
    cliff::{enter, on_terminal_cell},
    Grid,
};
use crate::{
    Action, CellEntity, Dynamics, GridConfig, Location, RewardConfig, StateInstance, StatePool,
};
use anyhow::Result;

/// Cross a field where wind blows towards a row of hazards.
///
/// The top row between the two left and right columns is a hazard, every other
/// cell of those middle columns carries an up-wind marker and the goal sits in
/// the bottom-right corner. After a move into a wind cell the agent is pushed
/// one further cell with the configured probability.
pub struct WindDynamics {
    grid: Grid,
    initial_state: StateInstance,
    rewards: RewardConfig,
    wind_probability: f64,
    rng: fastrand::Rng,
    pool: StatePool,
}

impl WindDynamics {
    /// Builds the world; `seed` drives the wind.
    pub fn build(config: &GridConfig, seed: u64) -> Result<Self> {
        let grid = Grid::from_config(config)?;
        let goal: Location = (grid.width() - 1, grid.height() - 1);
        let entities = (1..grid.width() - 1)
            .flat_map(|x| {
                (0..grid.height()).map(move |y| {
                    let entity = if y == 0 {
                        CellEntity::Hazard
                    } else {
                        CellEntity::WindUp
                    };
                    ((x, y), entity)
                })
            })
            .chain(std::iter::once((goal, CellEntity::Goal)))
            .filter(|&(c, _)| c != config.initial_agent_location);

        Ok(Self {
            grid,
            initial_state: StateInstance::new(config.initial_agent_location, entities, 0),
            rewards: config.rewards.clone(),
            wind_probability: config.wind_probability.clamp(0.0, 1.0),
            rng: fastrand::Rng::with_seed(seed),
            pool: StatePool::new(),
        })
    }
}

impl Dynamics for WindDynamics {
    fn is_stochastic(&self) -> bool {
        self.wind_probability > 0.0
    }

    fn initial_state(&self) -> StateInstance {
        self.initial_state.clone()
    }

    fn next(&mut self, state: &StateInstance, action: Action) -> (StateInstance, f64) {
        if self.is_terminal(state) {
            return (state.clone(), 0.0);
        }
        let mut loc = self.grid.step(state.agent_location(), action);
        if let Some(direction) = state.entity_at(loc).wind_direction() {
            if self.rng.f64() < self.wind_probability {
                loc = self.grid.step(loc, direction);
            }
        }
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
