//! Immutable snapshots of a grid world.
use super::Action;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};

/// Cell coordinate `(x, y)`.
pub type Location = (i32, i32);

/// What may occupy a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellEntity {
    /// The agent. Only reported by [`StateInstance::cell`], never stored.
    Agent,

    /// A cell worth a reward when reached.
    Goal,

    /// Nothing. Never stored, absent cells are empty.
    Empty,

    /// A cell ending the episode with a penalty.
    Hazard,

    /// Wind blowing towards `y = 0`.
    WindUp,

    /// Wind blowing away from `y = 0`.
    WindDown,

    /// Wind blowing towards `x = 0`.
    WindLeft,

    /// Wind blowing away from `x = 0`.
    WindRight,
}

impl CellEntity {
    /// Direction of the push if the entity is a wind marker.
    pub fn wind_direction(self) -> Option<Action> {
        match self {
            CellEntity::WindUp => Some(Action::Up),
            CellEntity::WindDown => Some(Action::Down),
            CellEntity::WindLeft => Some(Action::Left),
            CellEntity::WindRight => Some(Action::Right),
            _ => None,
        }
    }
}

/// A single field change applied to derive a new [`StateInstance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateChange {
    /// Moves the agent.
    AgentLocation(Location),

    /// Sets the remaining energy of the agent.
    AgentEnergy(i32),

    /// Places an entity in a cell, replacing what was there.
    ///
    /// [`CellEntity::Empty`] clears the cell and [`CellEntity::Agent`] moves the agent.
    SetEntity(Location, CellEntity),

    /// Clears a cell.
    ClearEntity(Location),
}

/// Immutable state of a grid world.
///
/// Entities are kept in a shared ordered map, so deriving a state that only
/// moves the agent does not copy the entity layout. Equality and hashing are
/// structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateInstance {
    agent_location: Location,
    entities: Arc<BTreeMap<Location, CellEntity>>,
    agent_energy: i32,
}

impl StateInstance {
    /// Constructs a state. Empty and agent entries in `entities` are dropped.
    pub fn new(
        agent_location: Location,
        entities: impl IntoIterator<Item = (Location, CellEntity)>,
        agent_energy: i32,
    ) -> Self {
        let entities = entities
            .into_iter()
            .filter(|(_, e)| !matches!(e, CellEntity::Empty | CellEntity::Agent))
            .collect();
        Self {
            agent_location,
            entities: Arc::new(entities),
            agent_energy,
        }
    }

    /// Builds a state by applying `changes` to an empty world with the agent at the origin.
    pub fn from_changes(changes: &[StateChange]) -> Self {
        Self::new((0, 0), std::iter::empty(), 0).with_changes(changes)
    }

    /// Returns a new state with `changes` applied in order.
    pub fn with_changes(&self, changes: &[StateChange]) -> Self {
        let mut state = self.clone();
        for change in changes {
            match *change {
                StateChange::AgentLocation(loc) | StateChange::SetEntity(loc, CellEntity::Agent) => {
                    state.agent_location = loc
                }
                StateChange::AgentEnergy(energy) => state.agent_energy = energy,
                StateChange::SetEntity(loc, CellEntity::Empty) | StateChange::ClearEntity(loc) => {
                    if state.entities.contains_key(&loc) {
                        Arc::make_mut(&mut state.entities).remove(&loc);
                    }
                }
                StateChange::SetEntity(loc, entity) => {
                    if state.entities.get(&loc) != Some(&entity) {
                        Arc::make_mut(&mut state.entities).insert(loc, entity);
                    }
                }
            }
        }
        state
    }

    /// Location of the agent.
    pub fn agent_location(&self) -> Location {
        self.agent_location
    }

    /// Remaining energy of the agent.
    pub fn agent_energy(&self) -> i32 {
        self.agent_energy
    }

    /// Non-empty cells, excluding the agent.
    pub fn entities(&self) -> &BTreeMap<Location, CellEntity> {
        &self.entities
    }

    /// Entity stored at `loc`, ignoring the agent.
    pub fn entity_at(&self, loc: Location) -> CellEntity {
        self.entities.get(&loc).copied().unwrap_or(CellEntity::Empty)
    }

    /// What a renderer shows at `loc`: the agent wins over stored entities.
    pub fn cell(&self, loc: Location) -> CellEntity {
        if loc == self.agent_location {
            CellEntity::Agent
        } else {
            self.entity_at(loc)
        }
    }

    /// Number of cells holding `entity`.
    pub fn count(&self, entity: CellEntity) -> usize {
        self.entities.values().filter(|&&e| e == entity).count()
    }

    /// Entity layout shared by all states that differ only in the agent.
    pub fn layout(&self) -> Arc<BTreeMap<Location, CellEntity>> {
        self.entities.clone()
    }
}
