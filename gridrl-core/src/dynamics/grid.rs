use crate::{error::GridRlError, Action, GridConfig, Location};

/// Bounds of a grid world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    /// Constructs the grid and validates the initial agent location of `config`.
    pub fn from_config(config: &GridConfig) -> Result<Self, GridRlError> {
        let grid = Self {
            width: config.width,
            height: config.height,
        };
        let (x, y) = config.initial_agent_location;
        // An empty grid contains no location.
        if !grid.contains((x, y)) {
            return Err(GridRlError::LocationOutOfBounds {
                x,
                y,
                width: config.width,
                height: config.height,
            });
        }
        Ok(grid)
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Returns `true` if `loc` is inside the grid.
    pub fn contains(&self, (x, y): Location) -> bool {
        0 <= x && x < self.width && 0 <= y && y < self.height
    }

    /// Location reached by `action`; moves into the border leave the agent in place.
    pub fn step(&self, loc: Location, action: Action) -> Location {
        let (dx, dy) = action.offset();
        let next = (loc.0 + dx, loc.1 + dy);
        if self.contains(next) {
            next
        } else {
            loc
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Location> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }
}
