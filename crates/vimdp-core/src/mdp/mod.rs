pub mod arena;
pub mod config;
pub mod error;
pub mod ids;
pub mod outcomes;
pub mod simulator;
pub mod snapshot;
pub mod solver;
pub mod state;
pub mod tables;

#[cfg(test)]
mod tests;
