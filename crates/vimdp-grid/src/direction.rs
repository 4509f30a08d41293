use std::fmt;

use serde::{Deserialize, Serialize};

/// Stepping direction on the grid. Rows grow downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
    NoOp,
}

impl Direction {
    /// The four moving directions, in the order actions are registered.
    pub const STEPS: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// `(row, col)` offset of one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::NoOp => (0, 0),
        }
    }

    /// The two directions perpendicular to this one. The no-op has none.
    pub fn perpendicular(self) -> &'static [Direction] {
        match self {
            Direction::Up | Direction::Down => &[Direction::Left, Direction::Right],
            Direction::Right | Direction::Left => &[Direction::Up, Direction::Down],
            Direction::NoOp => &[],
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Right => '>',
            Direction::Down => 'v',
            Direction::Left => '<',
            Direction::NoOp => '+',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
