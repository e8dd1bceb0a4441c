//! Core types and traits.
mod action;
mod agent;
mod dynamics;
mod state;
mod transition;
pub use action::{Action, ActionValues};
pub use agent::{Agent, ValueTable};
pub use dynamics::{Dynamics, SharedDynamics};
pub use state::{CellEntity, Location, StateChange, StateInstance};
pub use transition::TransitionInformation;
