//! Actions of the grid worlds.
use crate::error::GridRlError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Moves available to the agent.
///
/// The ordinal of each variant is used directly as an index into per-action
/// arrays such as [`ActionValues`], so the discriminants must stay dense and
/// zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Move one row towards `y = 0`.
    Up = 0,

    /// Move one row away from `y = 0`.
    Down = 1,

    /// Move one column towards `x = 0`.
    Left = 2,

    /// Move one column away from `x = 0`.
    Right = 3,
}

/// One value per [`Action`], indexed by [`Action::index`].
pub type ActionValues = [f64; Action::COUNT];

impl Action {
    /// The number of actions.
    pub const COUNT: usize = 4;

    /// All actions in ordinal order.
    pub const ALL: [Action; Action::COUNT] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Ordinal of the action.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the action with the given ordinal.
    pub fn from_index(ix: usize) -> Option<Self> {
        Self::ALL.get(ix).copied()
    }

    /// Displacement `(dx, dy)` of the move.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    /// Draws an action uniformly at random.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(..Self::COUNT)]
    }

    fn name(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = GridRlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| GridRlError::UnknownOption {
                kind: "action",
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_are_dense_indices() {
        for (ix, a) in Action::ALL.iter().enumerate() {
            assert_eq!(a.index(), ix);
            assert_eq!(Action::from_index(ix), Some(*a));
        }
        assert_eq!(Action::from_index(Action::COUNT), None);
    }

    #[test]
    fn parse_names() {
        assert_eq!("left".parse::<Action>().unwrap(), Action::Left);
        assert!("jump".parse::<Action>().is_err());
    }
}
