use serde::{Deserialize, Serialize};
use tracing::debug;
use vimdp_core::{
    MdpError, OutcomeDistribution, SolveReport, Solver, SolverConfig, StateArena, StateKey,
};

use crate::{direction::Direction, error::GridError};

/// Probability that a move goes where it was intended.
pub const CORRECT_OUTCOME_PROB: f64 = 0.8;
/// Probability of slipping into one specific perpendicular direction.
pub const PERP_OUTCOME_PROB: f64 = 0.1;
/// Reward of a slot nobody configured.
pub const DEFAULT_REWARD: f64 = -1.0;

/// Tolerance for the drift probabilities adding up to 1.
const DRIFT_TOLERANCE: f64 = 1e-9;

/// Identity of a grid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Slot { row: usize, col: usize },
    /// Absorbing state entered after leaving a terminal slot.
    Ended,
}

/// How likely a move lands where intended versus on each perpendicular side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    pub correct: f64,
    pub perpendicular: f64,
}

impl Default for Drift {
    fn default() -> Self {
        Drift {
            correct: CORRECT_OUTCOME_PROB,
            perpendicular: PERP_OUTCOME_PROB,
        }
    }
}

impl Drift {
    pub fn validate(&self) -> Result<(), GridError> {
        let in_range = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
        let total = self.correct + 2.0 * self.perpendicular;
        if !in_range(self.correct)
            || !in_range(self.perpendicular)
            || (total - 1.0).abs() > DRIFT_TOLERANCE
        {
            return Err(GridError::InvalidDrift {
                correct: self.correct,
                perpendicular: self.perpendicular,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Grid world MDP: every slot is a state with four noisy moves.
/// Moving off the edge keeps the agent in place. Terminal slots lead
/// to a single shared absorbing state.
pub struct GridMdp {
    height: usize,
    width: usize,
    drift: Drift,
    slots: Vec<StateKey>,
    ended: StateKey,
    solver: Solver<Cell, Direction>,
}

impl GridMdp {
    /// Create a `height` x `width` grid with the default 80/10/10 drift.
    pub fn new(height: usize, width: usize, gamma: f64) -> Result<Self, GridError> {
        Self::with_drift(height, width, gamma, Drift::default())
    }

    pub fn with_drift(
        height: usize,
        width: usize,
        gamma: f64,
        drift: Drift,
    ) -> Result<Self, GridError> {
        if height == 0 || width == 0 {
            return Err(GridError::EmptyGrid { height, width });
        }
        drift.validate()?;

        let mut states = StateArena::with_capacity(height * width + 1);
        let mut slots = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                slots.push(states.insert(Cell::Slot { row, col }, DEFAULT_REWARD)?);
            }
        }

        let ended = states.insert(Cell::Ended, 0.0)?;
        states
            .state_mut(ended)?
            .add_action(Direction::NoOp, OutcomeDistribution::certain(ended));

        let mut grid = GridMdp {
            height,
            width,
            drift,
            slots,
            ended,
            solver: Solver::new(states, gamma)?,
        };
        for row in 0..height {
            for col in 0..width {
                grid.wire_slot(row, col)?;
            }
        }

        debug!(height, width, gamma, "built grid mdp");
        Ok(grid)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn drift(&self) -> Drift {
        self.drift
    }

    /// Clamp a possibly out-of-range coordinate onto the grid.
    pub fn crop(&self, row: isize, col: isize) -> (usize, usize) {
        let row = row.clamp(0, self.height as isize - 1) as usize;
        let col = col.clamp(0, self.width as isize - 1) as usize;
        (row, col)
    }

    /// Key of the state at `(row, col)`.
    pub fn slot(&self, row: usize, col: usize) -> Result<StateKey, GridError> {
        if row >= self.height || col >= self.width {
            return Err(GridError::OutOfBounds {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(self.slots[row * self.width + col])
    }

    /// Key of the shared absorbing state.
    pub fn ended_state(&self) -> StateKey {
        self.ended
    }

    /// Slot reached by stepping once in `direction`, clamped at the edges.
    fn step_target(&self, row: usize, col: usize, direction: Direction) -> StateKey {
        let (dr, dc) = direction.delta();
        let (row, col) = self.crop(row as isize + dr, col as isize + dc);
        self.slots[row * self.width + col]
    }

    /// Register the four moves of a slot. Slips that clamp onto the same
    /// slot add up.
    fn wire_slot(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        let mut table = Vec::with_capacity(Direction::STEPS.len());
        for direction in Direction::STEPS {
            let mut outcomes = OutcomeDistribution::new();
            outcomes.accumulate(self.step_target(row, col, direction), self.drift.correct);
            for perp in direction.perpendicular() {
                outcomes.accumulate(self.step_target(row, col, *perp), self.drift.perpendicular);
            }
            table.push((direction, outcomes));
        }

        let key = self.slot(row, col)?;
        self.solver.state_mut(key)?.set_actions(table);
        Ok(())
    }

    pub fn set_reward(&mut self, row: usize, col: usize, reward: f64) -> Result<(), GridError> {
        let key = self.slot(row, col)?;
        self.solver.state_mut(key)?.set_reward(reward);
        Ok(())
    }

    pub fn reward(&self, row: usize, col: usize) -> Result<f64, GridError> {
        Ok(self.solver.state(self.slot(row, col)?)?.reward())
    }

    /// Make `(row, col)` terminal: its only action becomes a no-op into the
    /// absorbing state, so its reward is collected exactly once.
    pub fn set_terminal(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        let key = self.slot(row, col)?;
        let ended = self.ended;
        self.solver
            .state_mut(key)?
            .set_actions([(Direction::NoOp, OutcomeDistribution::certain(ended))]);
        debug!(row, col, "marked slot terminal");
        Ok(())
    }

    pub fn is_terminal(&self, row: usize, col: usize) -> Result<bool, GridError> {
        let state = self.solver.state(self.slot(row, col)?)?;
        Ok(state.has_action(&Direction::NoOp))
    }

    /// Run value iteration, returning the number of Bellman updates.
    pub fn value_iteration(&mut self, eps: f64) -> Result<usize, GridError> {
        Ok(self.solver.value_iteration(eps)?)
    }

    pub fn calc_policy(&mut self) -> Result<(), GridError> {
        self.solver.calc_policy()?;
        Ok(())
    }

    /// Validate, iterate and extract the policy in one go.
    pub fn solve(&mut self, config: &SolverConfig) -> Result<SolveReport, GridError> {
        Ok(self.solver.solve(config)?)
    }

    pub fn solver(&self) -> &Solver<Cell, Direction> {
        &self.solver
    }

    fn map_slots<T, F>(&self, mut f: F) -> Result<Vec<Vec<T>>, GridError>
    where
        F: FnMut(StateKey) -> Result<T, GridError>,
    {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| f(self.slots[row * self.width + col]))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }

    /// Rewards laid out as rows of the grid.
    pub fn reward_map(&self) -> Result<Vec<Vec<f64>>, GridError> {
        self.map_slots(|key| Ok(self.solver.state(key)?.reward()))
    }

    /// Current utilities laid out as rows of the grid.
    pub fn utility_map(&self) -> Result<Vec<Vec<f64>>, GridError> {
        let utility = self.solver.utility();
        self.map_slots(|key| {
            utility
                .get(key)
                .ok_or_else(|| MdpError::UnknownState { key: key.index() }.into())
        })
    }

    /// Extracted policy laid out as rows of the grid.
    pub fn policy_map(&self) -> Result<Vec<Vec<Direction>>, GridError> {
        let policy = self.solver.policy()?;
        self.map_slots(|key| {
            policy
                .get(key)
                .copied()
                .ok_or_else(|| MdpError::UnknownState { key: key.index() }.into())
        })
    }
}
