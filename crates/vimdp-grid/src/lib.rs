mod config;
mod direction;
mod error;
mod grid;
mod io;

pub use config::{GridConfig, SlotRef, SlotReward};
pub use direction::Direction;
pub use error::GridError;
pub use grid::{
    CORRECT_OUTCOME_PROB, Cell, DEFAULT_REWARD, Drift, GridMdp, PERP_OUTCOME_PROB,
};
pub use io::{build_yaml, load_yaml, save_yaml};
