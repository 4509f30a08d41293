mod mdp;

pub use mdp::arena::StateArena;
pub use mdp::config::{SolverConfig, SolverConfigError};
pub use mdp::error::MdpError;
pub use mdp::ids::{Label, StateKey};
pub use mdp::outcomes::{Outcome, OutcomeDistribution};
pub use mdp::simulator::{Episode, PolicySimulator};
pub use mdp::snapshot::{SolutionSnapshot, StateSnapshot};
pub use mdp::solver::{SolveReport, Solver, SweepMetrics};
pub use mdp::state::State;
pub use mdp::tables::{Policy, UtilityTable};
