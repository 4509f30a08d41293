use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::GridError,
    grid::{CORRECT_OUTCOME_PROB, DEFAULT_REWARD, Drift, GridMdp, PERP_OUTCOME_PROB},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Serializable description of a grid scenario.
pub struct GridConfig {
    pub height: usize,
    pub width: usize,
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default = "default_correct_prob")]
    pub correct_prob: f64,
    #[serde(default = "default_perp_prob")]
    pub perp_prob: f64,
    /// Reward of every slot not listed in `rewards`.
    #[serde(default = "default_reward")]
    pub default_reward: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rewards: Vec<SlotReward>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terminals: Vec<SlotRef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
/// Reward override for one slot.
pub struct SlotReward {
    pub row: usize,
    pub col: usize,
    pub reward: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlotRef {
    pub row: usize,
    pub col: usize,
}

fn default_gamma() -> f64 {
    0.99
}

fn default_correct_prob() -> f64 {
    CORRECT_OUTCOME_PROB
}

fn default_perp_prob() -> f64 {
    PERP_OUTCOME_PROB
}

fn default_reward() -> f64 {
    DEFAULT_REWARD
}

impl GridConfig {
    /// Plain grid with default drift and rewards.
    pub fn new(height: usize, width: usize) -> Self {
        GridConfig {
            height,
            width,
            gamma: default_gamma(),
            correct_prob: default_correct_prob(),
            perp_prob: default_perp_prob(),
            default_reward: default_reward(),
            rewards: Vec::new(),
            terminals: Vec::new(),
        }
    }

    /// Parse a grid scenario from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, GridError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn drift(&self) -> Drift {
        Drift {
            correct: self.correct_prob,
            perpendicular: self.perp_prob,
        }
    }

    /// Build the grid MDP this scenario describes.
    pub fn build(&self) -> Result<GridMdp, GridError> {
        let mut grid = GridMdp::with_drift(self.height, self.width, self.gamma, self.drift())?;

        for row in 0..self.height {
            for col in 0..self.width {
                grid.set_reward(row, col, self.default_reward)?;
            }
        }
        for slot in &self.rewards {
            grid.set_reward(slot.row, slot.col, slot.reward)?;
        }
        for slot in &self.terminals {
            grid.set_terminal(slot.row, slot.col)?;
        }

        debug!(
            rewards = self.rewards.len(),
            terminals = self.terminals.len(),
            "applied grid scenario"
        );
        Ok(grid)
    }
}
