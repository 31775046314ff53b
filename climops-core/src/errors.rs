use thiserror::Error;

/// Error type for invalid operations on labelled arrays.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClimError {
    #[error("{0}")]
    Error(String),
    #[error("Array has no {0} dimension")]
    MissingDimension(String),
    #[error("Dimension {0} appears more than once")]
    DuplicateDimension(String),
    #[error("Unknown dimension name '{0}'")]
    UnknownDimension(String),
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("Coordinates must be sorted by latitude (ascending); order breaks at index {index}")]
    UnsortedCoordinates { index: usize },
    #[error("Dimension {first} must come before {second}, got positions {first_pos} and {second_pos}")]
    DimensionOrder {
        first: String,
        second: String,
        first_pos: usize,
        second_pos: usize,
    },
    #[error("Weights of shape {got:?} match neither the spatial shape {spatial:?} nor the full shape {full:?}")]
    WeightShapeMismatch {
        spatial: Vec<usize>,
        full: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("Expected {expected} weights, got {got}")]
    WeightLengthMismatch { expected: usize, got: usize },
    #[error("Selection {0} contains no values")]
    EmptySelection(String),
    #[error("Array has no spatial structure (dimensions: {0})")]
    NoSpatialStructure(String),
    #[error("Not implemented: {0}")]
    NotImplemented(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience type for `Result<T, ClimError>`.
pub type ClimResult<T> = Result<T, ClimError>;
