//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridRlError {
    /// An agent, dynamics or exploration option name that is not known.
    #[error("Unknown {kind} option: {name}")]
    UnknownOption {
        /// What kind of option was requested.
        kind: &'static str,
        /// The requested name.
        name: String,
    },

    /// The configured initial agent location is outside of the grid.
    #[error("Location ({x}, {y}) is out of the {width}x{height} grid")]
    LocationOutOfBounds {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
        /// Grid width.
        width: i32,
        /// Grid height.
        height: i32,
    },

    /// The transition distribution was queried before being compiled.
    #[error("Dynamics distribution has not been compiled")]
    NotCompiled,

    /// A state id that was never issued by the pool.
    #[error("Invalid state id: {0}")]
    InvalidStateId(usize),

    /// A hyperparameter the strategy cannot answer.
    #[error("Unknown hyperparameter: {0}")]
    UnknownHyperParameter(String),

    /// Integer coercion of a value with a fractional part.
    #[error("Hyperparameter {parameter} has non-integral value {value}")]
    NonIntegralValue {
        /// Name of the hyperparameter.
        parameter: String,
        /// The offending value.
        value: f64,
    },

    /// The hyperparameter cannot be tuned for the current target.
    #[error("Hyperparameter {0} is not tunable for this target")]
    InvalidParameter(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
