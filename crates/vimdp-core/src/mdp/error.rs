use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
/// Error type for state wiring, validation, and solving.
pub enum MdpError {
    #[error("state key {key} does not exist")]
    UnknownState { key: usize },

    #[error("duplicate state id {id}")]
    DuplicateStateId { id: String },

    #[error("state {state} has no action {action}")]
    UnknownAction { state: String, action: String },

    #[error("state {state}, action {action} has no outcome leading to state key {next}")]
    UnknownOutcome {
        state: String,
        action: String,
        next: usize,
    },

    #[error("state {state} has no registered actions")]
    NoActions { state: String },

    #[error("state {state}, action {action} must contain at least one outcome")]
    EmptyOutcomes { state: String, action: String },

    #[error("no action of state {state} has a comparable expected utility")]
    UndefinedPolicy { state: String },

    #[error("policy has not been computed yet")]
    PolicyNotComputed,

    #[error("state {state} has no preferred action yet")]
    PreferredActionUnset { state: String },

    #[error("discount factor must lie in [0, 1), got {gamma}")]
    InvalidDiscount { gamma: f64 },

    #[error("solver config discount factor {configured} differs from the solver's {solver}")]
    DiscountMismatch { configured: f64, solver: f64 },

    #[error("utility became NaN during sweep {iteration}")]
    NonFiniteUtility { iteration: usize },

    #[error("epsilon must be finite and greater than 0, got {eps}")]
    InvalidEpsilon { eps: f64 },

    #[error("invalid probability in state {state}, action {action}, outcome state key {next}: {value}")]
    InvalidProbability {
        state: String,
        action: String,
        next: usize,
        value: f64,
    },

    #[error("invalid reward in state {state}: {value}")]
    InvalidReward { state: String, value: f64 },

    #[error(
        "probability sum for state {state}, action {action} must be within {tolerance} of 1.0, got {sum}"
    )]
    ProbabilitySum {
        state: String,
        action: String,
        sum: f64,
        tolerance: f64,
    },
}
