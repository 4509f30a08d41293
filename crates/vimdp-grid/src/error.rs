use thiserror::Error;
use vimdp_core::MdpError;

#[derive(Debug, Error)]
/// Error type for grid construction, scenario loading, and solving.
pub enum GridError {
    #[error(transparent)]
    Mdp(#[from] MdpError),

    #[error("failed to read grid file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse grid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("grid must have at least one row and one column, got {height}x{width}")]
    EmptyGrid { height: usize, width: usize },

    #[error("slot ({row}, {col}) is outside the {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error(
        "drift probabilities must be in [0, 1] with correct + 2 * perpendicular = 1, got {correct} and {perpendicular}"
    )]
    InvalidDrift { correct: f64, perpendicular: f64 },
}
