use thiserror::Error;

/// Errors raised while building an environment or an agent
///
/// Once construction succeeds nothing in the learning loop can fail.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid grid dimensions {rows}x{columns}: rows must be at least 3 and columns at least 1")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("{kind} cell {state} lies outside the {size}-cell grid")]
    CellOutOfBounds {
        kind: &'static str,
        state: usize,
        size: usize,
    },

    #[error("{kind} cell {state} coincides with the goal")]
    GoalConflict { kind: &'static str, state: usize },

    #[error("invalid value for `{name}`: {value} is not in the interval [{min}, {max}]")]
    OutOfInterval {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("invalid decay schedule: {0}")]
    InvalidDecay(String),

    #[error("q-table is {rows}x{columns} but the environment needs {states}x{actions}")]
    TableShape {
        rows: usize,
        columns: usize,
        states: usize,
        actions: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
